use super::select_new;
use crate::config::SyncConfig;
use crate::error::{AppError, Result};
use crate::models::{AccountNames, SheetRow};
use crate::plaid::PlaidOperations;
use crate::sheets::SheetOperations;
use chrono::{Duration, Local, NaiveDate};
use indicatif::ProgressStyle;
use tracing::{Span, debug, info, instrument, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

pub struct SyncEngine<PC, SC> {
    config: SyncConfig,
    plaid_client: PC,
    sheets_client: SC,
}

/// Rows to append, and the boundary they were selected against.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    pub last_id: Option<String>,
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub appended: usize,
    /// ID the next run will start after.
    pub last_id: Option<String>,
}

impl<PC, SC> SyncEngine<PC, SC>
where
    PC: PlaidOperations + Sync,
    SC: SheetOperations + Sync,
{
    pub fn new(config: SyncConfig, plaid_client: PC, sheets_client: SC) -> Self {
        Self {
            config,
            plaid_client,
            sheets_client,
        }
    }

    /// Trailing window of `lookback_days` ending on `today`, both inclusive.
    pub fn window(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let from = Duration::try_days(i64::from(self.config.lookback_days))
            .and_then(|lookback| today.checked_sub_signed(lookback))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Lookback of {} days from {} is out of range",
                    self.config.lookback_days, today
                ))
            })?;
        Ok((from, today))
    }

    pub fn today_window(&self) -> Result<(NaiveDate, NaiveDate)> {
        self.window(Local::now().date_naive())
    }

    #[instrument(name = "Sync", skip_all)]
    pub async fn sync(&self) -> Result<SyncReport> {
        let span = Span::current();
        span.pb_set_style(
            &ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| AppError::Other(e.into()))?,
        );
        span.pb_set_length(3);

        let (from, to) = self.today_window()?;

        span.pb_set_message("Reading sheet");
        let last_id = self.sheets_client.last_transaction_id().await?;
        span.pb_inc(1);

        span.pb_set_message("Fetching transactions");
        let plan = self.plan_after(last_id, from, to).await?;
        span.pb_inc(1);

        span.pb_set_message("Appending rows");
        self.sheets_client.append_rows(&plan.rows).await?;
        span.pb_inc(1);

        let report = SyncReport {
            appended: plan.rows.len(),
            last_id: plan.rows.last().map(|r| r.id.clone()).or(plan.last_id),
        };
        info!(appended = report.appended, last_id = ?report.last_id, "Rows appended");

        Ok(report)
    }

    /// Work out which rows a sync would append, without writing anything.
    #[instrument(name = "Planning sync", skip_all, fields(%from, %to))]
    pub async fn plan(&self, from: NaiveDate, to: NaiveDate) -> Result<SyncPlan> {
        let last_id = self.sheets_client.last_transaction_id().await?;
        self.plan_after(last_id, from, to).await
    }

    async fn plan_after(
        &self,
        last_id: Option<String>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SyncPlan> {
        debug!(?last_id, "Last recorded transaction");

        let transactions = self.plaid_client.get_transactions(from, to).await?;
        let accounts: AccountNames = self.plaid_client.get_accounts().await?.into_iter().collect();

        let rows: Vec<SheetRow> = select_new(&transactions, last_id.as_deref())
            .into_iter()
            .map(|t| {
                let account_name = accounts.get(&t.account_id);
                if account_name.is_none() {
                    warn!(account_id = %t.account_id, transaction_id = %t.id, "Unknown account");
                }
                SheetRow::new(t, account_name)
            })
            .collect();

        debug!(
            fetched = transactions.len(),
            new = rows.len(),
            "Selected new transactions"
        );

        Ok(SyncPlan { last_id, rows })
    }
}
