pub mod credits;
pub mod demo;
pub mod extract;
pub mod grading;
pub mod portal;
pub mod report;

use log::warn;
use crate::models::{ApiResponse, GradedResult};
use crate::utils::credits::CreditTable;
use crate::utils::extract::extract;
use crate::utils::grading::grade;

pub const EXTRACTION_FAILED: &str = "Could not fetch result data";

/// Extracts and grades a result page. A page with no semesters becomes a failure envelope.
pub fn process(html: &str, credits: &CreditTable) -> ApiResponse<GradedResult> {
    let parsed = extract(html);
    if parsed.semesters.is_empty() {
        warn!("No semesters found in result page ({} bytes)", html.len());
        return ApiResponse::failure(EXTRACTION_FAILED);
    }
    ApiResponse::ok(grade(&parsed, credits))
}
