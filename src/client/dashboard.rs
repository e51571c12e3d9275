use tracing::{info, warn};

use super::{ClientError, FormSession, SalesDataClient};
use crate::chart::{self, ChartData, ChartMode};
use crate::dto::SalesRecord;

/// Client-side view state: the last successful full read plus an error banner.
///
/// Mutations never patch `records` locally; each successful one is followed by a
/// full re-fetch.
#[derive(Debug)]
pub struct Dashboard {
    client: SalesDataClient,
    records: Vec<SalesRecord>,
    banner: Option<String>,
}

impl Dashboard {
    pub fn new(client: SalesDataClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            banner: None,
        }
    }

    pub fn client(&self) -> &SalesDataClient {
        &self.client
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn record(&self, id: i32) -> Option<&SalesRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        // Field violations are shown inline, not in the banner.
        if !matches!(err, ClientError::Validation(_)) {
            warn!(error = %err, "sales data request failed");
            self.banner = Some(err.banner());
        }
        err
    }

    /// Replaces `records` with a fresh full read. On failure the previous records stay.
    pub async fn refresh(&mut self) -> Result<&[SalesRecord], ClientError> {
        match self.client.list().await {
            Ok(records) => {
                self.records = records;
                Ok(&self.records)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// The write is already committed, so a failed re-fetch only sets the banner.
    async fn refresh_after_write(&mut self) {
        if self.refresh().await.is_err() {
            warn!("write succeeded but the record list could not be re-fetched");
        }
    }

    /// Sends the form as a create or update, then re-fetches. Nothing is sent when the
    /// form fails local validation.
    pub async fn submit(&mut self, form: &mut FormSession) -> Result<SalesRecord, ClientError> {
        let submission = form.begin_submit().map_err(ClientError::Validation)?;

        let result = match submission.editing {
            Some(id) => self.client.update(id, &submission.input).await,
            None => self.client.create(&submission.input).await,
        };

        match result {
            Ok(record) => {
                form.finish_submit(None);
                info!(id = record.id, "sales data saved");
                self.refresh_after_write().await;
                Ok(record)
            }
            Err(err) => {
                form.finish_submit(Some(err.field_errors().cloned().unwrap_or_default()));
                Err(self.fail(err))
            }
        }
    }

    /// Deletes one record, then re-fetches. Returns the server's confirmation.
    pub async fn delete(&mut self, id: i32) -> Result<String, ClientError> {
        match self.client.delete(id).await {
            Ok(message) => {
                info!(id, "sales data deleted");
                self.refresh_after_write().await;
                Ok(message)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Chart projection of the records currently held.
    pub fn chart(&self, mode: ChartMode) -> ChartData {
        chart::build(&self.records, mode)
    }
}
