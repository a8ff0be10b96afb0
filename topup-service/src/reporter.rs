// Report Renderer
// Formats per-company top-up results as the plain-text report

use crate::error::{ServiceError, ServiceResult};
use crate::topup::{CompanyTopUp, TopUpEntry};

use std::fs;
use std::path::Path;

const EMAILED_HEADER: &str = "-----Users Emailed------:";
const NOT_EMAILED_HEADER: &str = "---------Users Not Emailed-------:";

/// Renderer for the top-up report
pub struct ReportRenderer;

impl ReportRenderer {
    /// Render all company blocks, separated by a blank line
    pub fn render(results: &[CompanyTopUp]) -> String {
        results
            .iter()
            .map(Self::render_company)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a single company block
    pub fn render_company(result: &CompanyTopUp) -> String {
        let company = &result.company;
        let mut out = String::new();
        out.push_str(&format!("Company Id: {}\n", company.id));
        out.push_str(&format!("Company Name: {}\n", company.name));

        if !result.emailed.is_empty() {
            out.push_str(EMAILED_HEADER);
            out.push('\n');
            for entry in &result.emailed {
                Self::push_entry(&mut out, entry);
            }
        }

        if !result.not_emailed.is_empty() {
            out.push_str(NOT_EMAILED_HEADER);
            out.push('\n');
            for entry in &result.not_emailed {
                Self::push_entry(&mut out, entry);
            }
        }

        out.push_str(&format!(
            "Total amount of top-ups for {}: {}\n",
            company.name,
            format_amount(result.reported_total())
        ));
        out
    }

    /// Write the rendered report, replacing any existing file
    pub fn write<P: AsRef<Path>>(path: P, report: &str) -> ServiceResult<()> {
        let path = path.as_ref();
        fs::write(path, report).map_err(|source| ServiceError::WriteReport {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = report.len(), "report written");
        Ok(())
    }

    fn push_entry(out: &mut String, entry: &TopUpEntry) {
        let user = &entry.user;
        out.push_str(&format!(
            "{}, {}, {}\n",
            user.last_name, user.first_name, user.email
        ));
        out.push_str(&format!(
            "  Previous Token Balance: {}\n",
            format_amount(entry.previous_tokens)
        ));
        out.push_str(&format!(
            "  New Token Balance: {}\n",
            format_amount(entry.new_tokens())
        ));
    }
}

/// Format a token amount the way JSON numbers read: `8` rather than `8.0`,
/// and never `-0`
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
