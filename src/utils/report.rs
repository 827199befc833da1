use crate::models::GradedResult;

// Builds a plain-text report of a graded result, one block per semester.
pub fn render_summary(result: &GradedResult) -> String {
    let mut message = String::from("📚 Result Summary 📚\n\n");
    for (label, value) in [("Name", &result.student_name), ("Enrollment No", &result.enrollment_no), ("Programme", &result.programme)] {
        if !value.is_empty() {
            message.push_str(&format!("{}: {}\n", label, value));
        }
    }

    for semester in &result.semesters {
        message.push_str(&format!("\nSemester {}\n", semester.semester));
        for subject in &semester.subjects {
            let emoji = if subject.grade_point == 0 { "❌" } else { "📖" };
            message.push_str(&format!(
                "{} {} {} : {} marks, grade point {}, {} credits\n",
                emoji, subject.code, subject.name, subject.total, subject.grade_point, subject.credits
            ));
        }
        message.push_str(&format!("SGPA {} ({} credits)\n", semester.sgpa, semester.total_credits));
    }

    message += &format!("\nCGPA {} over {} credits 🚀", result.cgpa, result.total_credits);
    message
}
