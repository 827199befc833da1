use crate::models::{ParsedResult, Semester, Subject};

// (code, name, internal, external) per semester
const DEMO_SEMESTERS: [[(&str, &str, u32, u32); 5]; 4] = [
    [
        ("ES-101", "Engineering Physics", 23, 67),
        ("ES-102", "Engineering Chemistry", 21, 60),
        ("ES-103", "Mathematics-I", 24, 70),
        ("ES-104", "English", 20, 58),
        ("ES-105", "Engineering Graphics", 18, 52),
    ],
    [
        ("ES-111", "Mathematics-II", 22, 65),
        ("ES-112", "Basic Electronics", 19, 55),
        ("ES-113", "Programming in C", 25, 71),
        ("ES-114", "Environmental Studies", 20, 60),
        ("ES-115", "Workshop Practice", 22, 63),
    ],
    [
        ("ES-121", "Data Structures", 24, 68),
        ("ES-122", "Computer Organization", 21, 59),
        ("ES-123", "Digital Electronics", 23, 66),
        ("ES-124", "Mathematics-III", 22, 64),
        ("ES-125", "Operating Systems", 25, 70),
    ],
    [
        ("ES-131", "Database Management Systems", 23, 65),
        ("ES-132", "Computer Networks", 24, 69),
        ("ES-133", "Software Engineering", 22, 62),
        ("ES-134", "Theory of Computation", 21, 58),
        ("ES-135", "Microprocessors", 20, 56),
    ],
];

/// Fixed four-semester result used to exercise grading without hitting the portal.
pub fn demo_result() -> ParsedResult {
    let semesters = DEMO_SEMESTERS
        .iter()
        .zip(1..)
        .map(|(subjects, semester)| Semester {
            semester,
            subjects: subjects
                .iter()
                .map(|(code, name, internal, external)| Subject {
                    code: code.to_string(),
                    name: name.to_string(),
                    internal: *internal,
                    external: *external,
                    total: internal + external,
                })
                .collect(),
        })
        .collect();

    ParsedResult {
        student_name: "VIJAY KUMAR".to_string(),
        enrollment_no: "11015603123".to_string(),
        programme: "B.Tech - Computer Science & Engineering".to_string(),
        semesters,
    }
}
