//! Label report adapter.
//!
//! The label counter script prints a plain-text report for one calendar
//! day. The date is always passed explicitly so two reports for different
//! days can run side by side.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::{AdapterError, AdapterResult};
use crate::models::ScriptInvocation;
use crate::ScriptRunner;

/// Date format the script accepts right after `--screen`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct LabelReportAdapter {
    runner: Arc<dyn ScriptRunner>,
    script: PathBuf,
    profile: String,
}

impl LabelReportAdapter {
    pub fn new(runner: Arc<dyn ScriptRunner>, script: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            runner,
            script: script.into(),
            profile: profile.into(),
        }
    }

    pub fn invocation(&self, date: NaiveDate) -> ScriptInvocation {
        ScriptInvocation::new(&self.script)
            .arg("--screen")
            .arg(date.format(DATE_FORMAT).to_string())
            .env("AWS_PROFILE", &self.profile)
    }

    /// Report text for `date`. Empty output counts as invalid.
    pub async fn report_for(&self, date: NaiveDate) -> AdapterResult<String> {
        let output = self.runner.run(&self.invocation(date)).await?;
        let text = output.text()?.trim_end();
        if text.trim().is_empty() {
            return Err(AdapterError::InvalidOutput(format!(
                "label report for {date} was empty"
            )));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::tests::Canned;

    #[tokio::test]
    async fn passes_date_and_returns_text() {
        let runner = Canned::new("Label Summary:\nNewSales : 4\n\n");
        let adapter = LabelReportAdapter::new(runner.clone(), "combined_counter2.py", "gateway");
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();

        let report = adapter.report_for(date).await.unwrap();

        assert_eq!(report, "Label Summary:\nNewSales : 4");
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].args, vec!["--screen", "2024-03-08"]);
    }

    #[tokio::test]
    async fn blank_output_is_invalid() {
        let runner = Canned::new("  \n");
        let adapter = LabelReportAdapter::new(runner, "combined_counter2.py", "gateway");
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();

        let err = adapter.report_for(date).await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidOutput(_)));
    }

    /// Reads its date the way the label counter does: the argument directly
    /// after `--screen`, rejected unless it is `YYYY-MM-DD`.
    #[cfg(unix)]
    #[tokio::test]
    async fn date_follows_screen_flag_for_real_script() {
        use std::io::Write;

        use crate::process::ProcessRunner;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[ "$1" = "--screen" ] || exit 4
case "$2" in
  [0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]) echo "Label Summary for $2" ;;
  *) echo "time data '$2' does not match format '%Y-%m-%d'" >&2; exit 1 ;;
esac"#
        )
        .unwrap();
        let runner = Arc::new(ProcessRunner::new("sh"));
        let adapter = LabelReportAdapter::new(runner, file.path(), "gateway");
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

        let report = adapter.report_for(date).await.unwrap();

        assert_eq!(report, "Label Summary for 2024-03-11");
    }
}
