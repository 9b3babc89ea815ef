use crate::models::Transaction;
use tracing::{instrument, warn};

/// Select the settled transactions newer than `last_id`, oldest first.
///
/// `transactions` must be in Plaid order (newest first). Everything before
/// the first occurrence of `last_id` is new. When `last_id` is unset or not
/// in the window, the whole window is returned, which can repeat rows that
/// were written by an earlier run.
#[instrument(name = "Selecting new transactions", skip_all)]
pub fn select_new<'a>(
    transactions: &'a [Transaction],
    last_id: Option<&str>,
) -> Vec<&'a Transaction> {
    let settled: Vec<&Transaction> = transactions.iter().filter(|t| !t.pending).collect();

    let boundary = match last_id {
        Some(id) => settled.iter().position(|t| t.id == id),
        None => None,
    };

    let boundary = boundary.unwrap_or_else(|| {
        if let Some(id) = last_id {
            warn!(
                last_id = id,
                count = settled.len(),
                "Last recorded transaction not in window, treating all as new"
            );
        }
        settled.len()
    });

    let mut new: Vec<&Transaction> = settled.into_iter().take(boundary).collect();
    new.reverse();
    new
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::test_helpers::{mock_date, mock_transaction};
    use rust_decimal::prelude::dec;

    fn mock_window(ids: &[&str]) -> Vec<Transaction> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| mock_transaction(id, dec!(10), mock_date(2025, 1, 20 - i as u32)))
            .collect()
    }

    fn ids(selected: &[&Transaction]) -> Vec<String> {
        selected.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_select_before_boundary() {
        let window = mock_window(&["tx104", "tx103", "tx100", "tx101", "tx099"]);
        let selected = select_new(&window, Some("tx100"));
        assert_eq!(ids(&selected), vec!["tx103", "tx104"]);
    }

    #[test]
    fn test_select_count_matches_position() {
        let window = mock_window(&["a", "b", "c", "d", "e", "f"]);
        for (k, id) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
            let selected = select_new(&window, Some(id));
            assert_eq!(selected.len(), k, "boundary {} should yield {} rows", id, k);
        }
    }

    #[test]
    fn test_select_boundary_is_newest() {
        let window = mock_window(&["tx3", "tx2", "tx1"]);
        assert!(select_new(&window, Some("tx3")).is_empty());
    }

    #[test]
    fn test_select_unknown_boundary_returns_all() {
        let window = mock_window(&["tx3", "tx2", "tx1"]);
        let selected = select_new(&window, Some("tx_gone"));
        assert_eq!(ids(&selected), vec!["tx1", "tx2", "tx3"]);
    }

    #[test]
    fn test_select_without_boundary_returns_all() {
        let window = mock_window(&["tx3", "tx2", "tx1"]);
        let selected = select_new(&window, None);
        assert_eq!(ids(&selected), vec!["tx1", "tx2", "tx3"]);
    }

    #[test]
    fn test_select_skips_pending() {
        let mut window = mock_window(&["tx_pending", "tx3", "tx2", "tx1"]);
        window[0].pending = true;

        let selected = select_new(&window, Some("tx1"));
        assert_eq!(ids(&selected), vec!["tx2", "tx3"]);

        let selected = select_new(&window, None);
        assert_eq!(ids(&selected), vec!["tx1", "tx2", "tx3"]);
    }

    #[test]
    fn test_select_pending_boundary_is_not_found() {
        // A pending transaction is never written, so it cannot be a boundary.
        let mut window = mock_window(&["tx3", "tx2", "tx1"]);
        window[1].pending = true;

        let selected = select_new(&window, Some("tx2"));
        assert_eq!(ids(&selected), vec!["tx1", "tx3"]);
    }

    #[test]
    fn test_select_empty_window() {
        assert!(select_new(&[], Some("tx1")).is_empty());
        assert!(select_new(&[], None).is_empty());
    }
}
