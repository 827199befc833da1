use crate::models::{GradedResult, GradedSemester, GradedSubject, ParsedResult, Semester};
use crate::utils::credits::CreditTable;

// Lower mark bound of each grade band, highest first.
const GRADE_BANDS: [(u32, u32); 7] = [(90, 10), (75, 9), (65, 8), (55, 7), (50, 6), (45, 5), (40, 4)];

/// Maps total marks to a grade point. Anything under 40 is a fail (0).
pub fn grade_point(total: u32) -> u32 {
    GRADE_BANDS
        .iter()
        .find(|(min, _)| total >= *min)
        .map_or(0, |(_, point)| *point)
}

/// Credit-weighted average rendered with exactly two decimals.
///
/// Rounds half up on the exact ratio, so 9.125 becomes "9.13". Zero credits gives "0.00".
pub fn format_average(grade_points: u64, credits: u64) -> String {
    if credits == 0 {
        return "0.00".to_string();
    }
    let hundredths = (grade_points * 200 + credits) / (credits * 2);
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// Annotates every subject with its grade point and credits, then every semester with its SGPA,
/// then the whole result with total credits and CGPA. Never touches the inputs.
pub fn grade(parsed: &ParsedResult, credits: &CreditTable) -> GradedResult {
    let mut total_credits: u64 = 0;
    let mut total_grade_points: u64 = 0;

    let semesters = parsed
        .semesters
        .iter()
        .map(|semester| {
            let (graded, grade_points, semester_credits) = grade_semester(semester, credits);
            total_grade_points += grade_points;
            total_credits += semester_credits;
            graded
        })
        .collect();

    GradedResult {
        student_name: parsed.student_name.clone(),
        enrollment_no: parsed.enrollment_no.clone(),
        programme: parsed.programme.clone(),
        semesters,
        cgpa: format_average(total_grade_points, total_credits),
        total_credits: clamp_credits(total_credits),
    }
}

fn clamp_credits(credits: u64) -> u32 {
    u32::try_from(credits).unwrap_or(u32::MAX)
}

fn grade_semester(semester: &Semester, credits: &CreditTable) -> (GradedSemester, u64, u64) {
    let mut semester_credits: u64 = 0;
    let mut semester_grade_points: u64 = 0;

    let subjects = semester
        .subjects
        .iter()
        .map(|subject| {
            let point = grade_point(subject.total);
            let subject_credits = credits.credits_for(&subject.code);
            semester_grade_points += u64::from(point) * u64::from(subject_credits);
            semester_credits += u64::from(subject_credits);

            GradedSubject {
                code: subject.code.clone(),
                name: subject.name.clone(),
                internal: subject.internal,
                external: subject.external,
                total: subject.total,
                grade_point: point,
                credits: subject_credits,
            }
        })
        .collect();

    let graded = GradedSemester {
        semester: semester.semester,
        subjects,
        sgpa: format_average(semester_grade_points, semester_credits),
        total_credits: clamp_credits(semester_credits),
    };
    (graded, semester_grade_points, semester_credits)
}
