//! Text renderings of each listing, as printed by the binary.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveTime};

use crate::model::structs::{Course, Enrollment, Notification, Role, User};
use crate::model::wire;

use super::review::{filter_enrollments, StatusCounts, StatusFilter};
use super::student::{status_message, EnrollmentSummary, ENROLLMENT_CAP};

const RULE: &str = "============================================";

/// `Jan 2, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `9:00 AM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

fn format_timestamp_date(raw: &str) -> String {
    wire::parse_date(raw)
        .map(format_date)
        .unwrap_or_else(|| raw.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn render_user(user: &User) -> String {
    format!("{} <{}> ({}, id {})", user.name, user.email, user.role, user.id)
}

pub fn render_courses(courses: &[Course], role: Role) -> String {
    let mut out = String::new();
    let heading = match role {
        Role::Admin => "Course Management",
        Role::Student => "Available Courses (maximum 3 courses)",
    };
    let _ = writeln!(out, "{RULE}\n{heading}\n{RULE}");

    if courses.is_empty() {
        let _ = writeln!(out, "No courses available.");
        return out;
    }

    for course in courses {
        let _ = writeln!(out, "[{}] {}", course.id, course.title);
        if !course.description.is_empty() {
            let _ = writeln!(out, "    {}", course.description);
        }
        if !course.schedule.is_empty() {
            let _ = writeln!(out, "    Schedule: {}", course.schedule);
        }
        if let (Some(start), Some(end)) = (course.start_date, course.end_date) {
            let _ = writeln!(out, "    Period: {} - {}", format_date(start), format_date(end));
        }
        for session in &course.sessions {
            let _ = writeln!(
                out,
                "    Session {:<4} {:<8} {} - {}",
                session.id,
                capitalize(session.status.as_str()),
                format_time(session.start_time),
                format_time(session.end_time)
            );
        }
    }
    out
}

pub fn render_dates(course: &Course, dates: &[NaiveDate]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Enrollment dates for [{}] {}:", course.id, course.title);
    for date in dates {
        let _ = writeln!(out, "    {}  ({})", date.format(wire::DATE_FORMAT), format_date(*date));
    }
    if dates.is_empty() {
        let _ = writeln!(out, "    (none)");
    }
    out
}

pub fn render_enrollment_board(enrollments: &[Enrollment], filter: StatusFilter) -> String {
    let counts = StatusCounts::tally(enrollments);
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}\nEnrollment Management\n{RULE}");
    let tabs: Vec<String> = StatusFilter::ALL
        .iter()
        .map(|f| {
            let marker = if *f == filter { "*" } else { " " };
            format!("{marker}{} ({})", f.label(), counts.get(*f))
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join("  "));
    let _ = writeln!(out, "{RULE}");

    let shown = filter_enrollments(enrollments, filter);
    if shown.is_empty() {
        match filter {
            StatusFilter::All => {
                let _ = writeln!(out, "No enrollment requests have been submitted yet.");
            }
            other => {
                let _ = writeln!(out, "No {} enrollments found.", other.label().to_lowercase());
            }
        }
        return out;
    }

    for e in shown {
        let _ = writeln!(
            out,
            "#{:<5} {:<10} {:<20} {:<24} {}",
            e.id,
            capitalize(e.status.as_str()),
            e.user_name(),
            e.course_title(),
            format_timestamp_date(&e.created_at)
        );
        if let Some(date) = e.selected_date {
            let _ = writeln!(out, "       Selected date: {}", format_date(date));
        }
    }
    out
}

pub fn render_my_enrollments(enrollments: &[Enrollment]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}\nMy Enrollments\n{RULE}");

    if enrollments.is_empty() {
        let _ = writeln!(
            out,
            "You haven't enrolled in any courses yet. Run `enrollctl courses list` to browse."
        );
        return out;
    }

    for e in enrollments {
        let _ = writeln!(out, "{} [{}]", e.course_title(), capitalize(e.status.as_str()));
        if let Some(course) = &e.course {
            if !course.schedule.is_empty() {
                let _ = writeln!(out, "    Schedule: {}", course.schedule);
            }
        }
        let _ = writeln!(out, "    Enrolled: {}", format_timestamp_date(&e.created_at));
        let _ = writeln!(out, "    {}", status_message(e.status));
    }

    let counts = EnrollmentSummary::of(enrollments).counts;
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "Total enrollments: {} / {ENROLLMENT_CAP} (maximum allowed)",
        counts.all
    );
    let _ = writeln!(
        out,
        "Pending: {}  Approved: {}  Rejected: {}",
        counts.pending, counts.approved, counts.rejected
    );
    out
}

pub fn render_notifications(notifications: &[Notification]) -> String {
    let mut out = String::new();
    if notifications.is_empty() {
        let _ = writeln!(out, "No notifications yet.");
        return out;
    }
    for n in notifications {
        let marker = if n.is_read() { " " } else { "*" };
        let _ = writeln!(
            out,
            "{marker} {}  ({})",
            n.data.message,
            format_timestamp_date(&n.created_at)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structs::EnrollmentStatus;

    fn enrollment(id: u64, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id,
            user_id: 2,
            course_id: 1,
            status,
            created_at: "2024-02-01T09:30:00.000000Z".into(),
            updated_at: String::new(),
            selected_date: None,
            selected_session_id: None,
            course: None,
            user: None,
        }
    }

    #[test]
    fn dates_and_times_use_us_style() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()), "Jan 2, 2024");
        assert_eq!(format_time(NaiveTime::from_hms_opt(21, 5, 0).unwrap()), "9:05 PM");
    }

    #[test]
    fn board_shows_counts_and_empty_filter_message() {
        let list = vec![
            enrollment(1, EnrollmentStatus::Pending),
            enrollment(2, EnrollmentStatus::Approved),
        ];
        let text = render_enrollment_board(&list, StatusFilter::Rejected);
        assert!(text.contains("All (2)"));
        assert!(text.contains("Pending (1)"));
        assert!(text.contains("*Rejected (0)"));
        assert!(text.contains("No rejected enrollments found."));
    }

    #[test]
    fn my_enrollments_summary_mentions_cap() {
        let list = vec![enrollment(1, EnrollmentStatus::Pending)];
        let text = render_my_enrollments(&list);
        assert!(text.contains("Total enrollments: 1 / 3"));
        assert!(text.contains("Unknown Course [Pending]"));
        assert!(text.contains("Enrolled: Feb 1, 2024"));
    }
}
