//! Import command - loads a JSON product file into storage

use std::path::PathBuf;

use tracing::{info, warn};

use crate::infrastructure::services::ImportReport;

/// Import a product file. Fails when nothing could be imported cleanly.
pub async fn run(file: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let path = file.unwrap_or_else(|| config.import.file_path.clone());

    let state = crate::create_app_state_with_config(&config).await?;

    info!(path = %path.display(), "Importing products");
    let report = state.import.import_file(&path).await?;

    println!("{}", render_report(&report));

    if report.is_success() {
        Ok(())
    } else {
        warn!(errors = report.errors.len(), "Import finished with errors");
        anyhow::bail!("import of {} finished with errors", path.display())
    }
}

fn render_report(report: &ImportReport) -> String {
    let mut lines = vec![format!("Imported {} products", report.imported_count)];
    lines.extend(report.errors.iter().map(|e| format!("  error: {}", e)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_report() {
        let report = ImportReport {
            imported_count: 3,
            errors: vec!["Fruits import failed: Storage error".to_string()],
        };

        assert_eq!(
            render_report(&report),
            "Imported 3 products\n  error: Fruits import failed: Storage error"
        );
    }

    #[test]
    fn test_render_clean_report() {
        let report = ImportReport {
            imported_count: 12,
            errors: vec![],
        };

        assert_eq!(render_report(&report), "Imported 12 products");
    }
}
