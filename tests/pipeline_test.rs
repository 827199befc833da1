use std::io::Write;
use ipu_results::utils::credits::CreditTable;
use ipu_results::utils::demo::demo_result;
use ipu_results::{extract, grade, process, ParsedResult};
use serde_json::json;
use tempfile::NamedTempFile;

const RESULT_PAGE: &str = r#"<html><body>
<table class="info">
  <tr><td><b>Student Name</b></td><td>VIJAY KUMAR</td></tr>
  <tr><td><b>Enrolment No</b></td><td>11015603123</td></tr>
  <tr><td><b>Programme</b></td><td>B.Tech - Computer Science &amp; Engineering</td></tr>
</table>
<h3>Semester 1</h3>
<table>
  <tr><td>S.No</td><td>Subject Code</td><td>Subject Name</td><td>Internal</td><td>External</td><td>Total</td></tr>
  <tr><td>1</td><td>ES-101</td><td>Engineering Physics</td><td>23</td><td>67</td><td>90</td></tr>
  <tr><td>2</td><td>ES-102</td><td>Engineering Chemistry</td><td>21</td><td>60</td><td>81</td></tr>
  <tr><td colspan="6">Result declared</td></tr>
</table>
<h3>Semester 2</h3>
<table>
  <tr><th>S.No</th><th>Subject Code</th><th>Subject Name</th><th>Marks</th></tr>
  <tr><td>1</td><td>ES-111</td><td>Mathematics-II</td><td>87</td></tr>
  <tr><td>2</td><td>ES-112</td><td>Basic Electronics</td><td>38</td></tr>
</table>
</body></html>"#;

fn credits_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_extracts_identity_and_semesters() {
    let result = extract(RESULT_PAGE);

    assert_eq!(result.student_name, "VIJAY KUMAR");
    assert_eq!(result.enrollment_no, "11015603123");
    assert_eq!(result.programme, "B.Tech - Computer Science & Engineering");

    assert_eq!(result.semesters.len(), 2);
    let first = &result.semesters[0];
    assert_eq!(first.semester, 1);
    assert_eq!(first.subjects.len(), 2);
    assert_eq!(first.subjects[0].code, "ES-101");
    assert_eq!(first.subjects[0].name, "Engineering Physics");
    assert_eq!((first.subjects[0].internal, first.subjects[0].external, first.subjects[0].total), (23, 67, 90));
}

#[test]
fn test_code_and_name_headers_without_component_marks() {
    let result = extract(RESULT_PAGE);
    let second = &result.semesters[1];

    assert_eq!(second.semester, 2);
    let codes: Vec<&str> = second.subjects.iter().map(|s| s.code.as_str()).collect();
    let totals: Vec<u32> = second.subjects.iter().map(|s| s.total).collect();
    assert_eq!(codes, vec!["ES-111", "ES-112"]);
    assert_eq!(totals, vec![87, 38]);
    assert_eq!(second.subjects[0].name, "Mathematics-II");
}

#[test]
fn test_page_without_tables_or_labels() {
    let result = extract("<html><head><title>Login</title></head><body><form><input name='x'></form></body></html>");
    assert_eq!(result, ParsedResult::default());
}

#[test]
fn test_process_grades_with_loaded_credits() {
    let file = credits_file("code,credits\nES-101,4\nES-102,4\nES-111, 4\n");
    let credits = CreditTable::load(file.path());
    assert_eq!(credits.len(), 3);

    let response = process(RESULT_PAGE, &credits);
    assert!(response.success);
    let graded = response.data.unwrap();

    // (10*4 + 9*4) / 8
    assert_eq!(graded.semesters[0].sgpa, "9.50");
    assert_eq!(graded.semesters[0].total_credits, 8);
    // ES-112 falls back to 3 credits and fails: (9*4 + 0*3) / 7
    assert_eq!(graded.semesters[1].subjects[1].credits, 3);
    assert_eq!(graded.semesters[1].subjects[1].grade_point, 0);
    assert_eq!(graded.semesters[1].sgpa, "5.14");
    // 112 grade points over 15 credits
    assert_eq!(graded.total_credits, 15);
    assert_eq!(graded.cgpa, "7.47");
}

#[test]
fn test_failure_envelope_for_empty_page() {
    let response = process("<p>Session expired</p>", &CreditTable::empty());
    let body = serde_json::to_value(&response).unwrap();

    assert_eq!(body, json!({ "success": false, "error": "Could not fetch result data" }));
}

#[test]
fn test_success_envelope_uses_camel_case() {
    let graded = grade(&demo_result(), &CreditTable::empty());
    let body = serde_json::to_value(ipu_results::ApiResponse::ok(graded)).unwrap();

    assert_eq!(body["success"], json!(true));
    assert!(body.get("error").is_none());
    let data = &body["data"];
    assert_eq!(data["studentName"], json!("VIJAY KUMAR"));
    assert_eq!(data["enrollmentNo"], json!("11015603123"));
    assert_eq!(data["cgpa"], json!("9.20"));
    assert_eq!(data["totalCredits"], json!(60));
    assert_eq!(data["semesters"][0]["sgpa"], json!("9.20"));
    assert_eq!(data["semesters"][0]["totalCredits"], json!(15));
    assert_eq!(
        data["semesters"][0]["subjects"][0],
        json!({
            "code": "ES-101",
            "name": "Engineering Physics",
            "internal": 23,
            "external": 67,
            "total": 90,
            "gradePoint": 10,
            "credits": 3
        })
    );
}
