use askama::Template;
use askama_web::WebTemplate;

/// Chrome shared by every signed-in page.
pub(crate) struct Layout {
    pub(crate) app_name: String,
    pub(crate) user_name: String,
    pub(crate) user_initials: String,
    pub(crate) is_manager: bool,
    pub(crate) active: &'static str,
    pub(crate) unread_notifications: usize,
}

pub(crate) struct SelectOption {
    pub(crate) value: String,
    pub(crate) label: String,
    pub(crate) selected: bool,
}

pub(crate) struct MemberRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) initials: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) plan_name: String,
    pub(crate) status: &'static str,
    pub(crate) status_label: &'static str,
    pub(crate) joined_at: String,
    pub(crate) expiry: String,
    pub(crate) days_left: String,
}

pub(crate) struct StatusTab {
    pub(crate) value: &'static str,
    pub(crate) label: &'static str,
    pub(crate) count: usize,
    pub(crate) selected: bool,
}

pub(crate) struct AttendanceBar {
    pub(crate) label: String,
    pub(crate) count: u32,
    pub(crate) percent: u32,
}

pub(crate) struct SlotView {
    pub(crate) course_id: String,
    pub(crate) name: String,
    pub(crate) instructor: String,
    pub(crate) sport_label: &'static str,
    pub(crate) day: &'static str,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    pub(crate) color: &'static str,
    pub(crate) enrolled: usize,
    pub(crate) capacity: u32,
    pub(crate) fill_percent: u32,
    pub(crate) duration: String,
}

pub(crate) struct DayCell {
    pub(crate) date: String,
    pub(crate) short_label: &'static str,
    pub(crate) day_number: u8,
    pub(crate) is_today: bool,
    pub(crate) is_selected: bool,
    pub(crate) lesson_count: usize,
}

pub(crate) struct PlanRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price: String,
    pub(crate) price_input: String,
    pub(crate) duration_months: u32,
    pub(crate) duration_label: String,
    pub(crate) max_entries: String,
    pub(crate) monthly_price: String,
    pub(crate) active_members: usize,
    pub(crate) monthly_revenue: String,
}

pub(crate) struct LessonRow {
    pub(crate) day_label: &'static str,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
}

pub(crate) struct CourseRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) instructor: String,
    pub(crate) sport_label: &'static str,
    pub(crate) sports: Vec<SelectOption>,
    pub(crate) capacity: u32,
    pub(crate) enrolled: usize,
    pub(crate) fill_percent: u32,
    pub(crate) color: &'static str,
    pub(crate) lessons: Vec<LessonRow>,
}

pub(crate) struct InstructorRow {
    pub(crate) id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) name: String,
    pub(crate) initials: String,
    pub(crate) bio: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) instagram: String,
    pub(crate) specialty_labels: String,
    pub(crate) specialties: Vec<SelectOption>,
}

pub(crate) struct NotificationRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) kind: &'static str,
    pub(crate) created_at: String,
    pub(crate) read: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub(crate) struct LoginTemplate {
    pub(crate) app_name: String,
    pub(crate) error: String,
    pub(crate) email: String,
    pub(crate) next: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub(crate) struct RegisterTemplate {
    pub(crate) app_name: String,
    pub(crate) error: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) is_manager: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "onboarding.html")]
pub(crate) struct OnboardingTemplate {
    pub(crate) app_name: String,
    pub(crate) error: String,
    pub(crate) first_name: String,
    pub(crate) is_manager: bool,
    pub(crate) phone: String,
    pub(crate) birth_date: String,
    pub(crate) gym_name: String,
    pub(crate) gym_address: String,
    pub(crate) sports: Vec<SelectOption>,
    pub(crate) invite_code: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub(crate) struct DashboardTemplate {
    pub(crate) layout: Layout,
    pub(crate) first_name: String,
    pub(crate) today_label: String,
    pub(crate) gym_name: String,
    pub(crate) invite_code: String,
    pub(crate) total_members: usize,
    pub(crate) active_members: usize,
    pub(crate) expiring_members: usize,
    pub(crate) expired_members: usize,
    pub(crate) monthly_revenue: String,
    pub(crate) expiring: Vec<MemberRow>,
    pub(crate) has_membership: bool,
    pub(crate) membership: Vec<MemberRow>,
    pub(crate) slots: Vec<SlotView>,
}

#[derive(Template, WebTemplate)]
#[template(path = "members.html")]
pub(crate) struct MembersTemplate {
    pub(crate) layout: Layout,
    pub(crate) query: String,
    pub(crate) filter: &'static str,
    pub(crate) tabs: Vec<StatusTab>,
    pub(crate) members: Vec<MemberRow>,
    pub(crate) plans: Vec<SelectOption>,
    pub(crate) error: String,
    pub(crate) form_first_name: String,
    pub(crate) form_last_name: String,
    pub(crate) form_email: String,
    pub(crate) form_phone: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "member_detail.html")]
pub(crate) struct MemberDetailTemplate {
    pub(crate) layout: Layout,
    pub(crate) member: MemberRow,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) has_account: bool,
    pub(crate) plans: Vec<SelectOption>,
    pub(crate) timetable_label: &'static str,
    pub(crate) attendance_months: Vec<AttendanceBar>,
    pub(crate) attendance_days: Vec<AttendanceBar>,
    pub(crate) attendance_this_month: u32,
    pub(crate) attendance_goal: u32,
    pub(crate) attendance_percent: u32,
    pub(crate) error: String,
    pub(crate) notice: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "subscriptions.html")]
pub(crate) struct SubscriptionsTemplate {
    pub(crate) layout: Layout,
    pub(crate) plans: Vec<PlanRow>,
    pub(crate) total_revenue: String,
    pub(crate) error: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "courses.html")]
pub(crate) struct CoursesTemplate {
    pub(crate) layout: Layout,
    pub(crate) courses: Vec<CourseRow>,
    pub(crate) sports: Vec<SelectOption>,
    pub(crate) instructors: Vec<String>,
    pub(crate) error: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "instructors.html")]
pub(crate) struct InstructorsTemplate {
    pub(crate) layout: Layout,
    pub(crate) instructors: Vec<InstructorRow>,
    pub(crate) sports: Vec<SelectOption>,
    pub(crate) error: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "schedule.html")]
pub(crate) struct ScheduleTemplate {
    pub(crate) layout: Layout,
    pub(crate) month_label: String,
    pub(crate) week_start: String,
    pub(crate) previous_week: String,
    pub(crate) next_week: String,
    pub(crate) days: Vec<DayCell>,
    pub(crate) selected_date: String,
    pub(crate) selected_label: String,
    pub(crate) slots: Vec<SlotView>,
    pub(crate) years: Vec<SelectOption>,
    pub(crate) months: Vec<SelectOption>,
    pub(crate) courses: Vec<SelectOption>,
    pub(crate) weekdays: Vec<SelectOption>,
    pub(crate) error: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "notifications.html")]
pub(crate) struct NotificationsTemplate {
    pub(crate) layout: Layout,
    pub(crate) notifications: Vec<NotificationRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "settings.html")]
pub(crate) struct SettingsTemplate {
    pub(crate) layout: Layout,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) birth_date: String,
    pub(crate) role_label: &'static str,
    pub(crate) gym_name: String,
    pub(crate) invite_code: String,
    pub(crate) notice: String,
    pub(crate) error: String,
}

pub(crate) fn format_euros(amount: f64) -> String {
    format!("€{amount:.2}")
}

pub(crate) fn initials(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .take(1)
        .chain(last_name.chars().take(1))
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    fn layout(is_manager: bool) -> Layout {
        Layout {
            app_name: "Pound for Pound".to_string(),
            user_name: "Marco Rossi".to_string(),
            user_initials: "MR".to_string(),
            is_manager,
            active: "dashboard",
            unread_notifications: 2,
        }
    }

    #[test]
    fn render_login__should_include_error_and_next() {
        // Given
        let template = LoginTemplate {
            app_name: "Pound for Pound".to_string(),
            error: "Invalid credentials.".to_string(),
            email: "manager@poundforpound.app".to_string(),
            next: "/members".to_string(),
        };

        // When
        let html = template.render().expect("render");

        // Then
        assert!(html.contains("Invalid credentials."));
        assert!(html.contains(r#"name="next" value="/members""#));
        assert!(html.contains(r#"value="manager@poundforpound.app""#));
    }

    #[test]
    fn render_notifications__should_hide_manager_links_for_athletes() {
        // Given
        let template = NotificationsTemplate {
            layout: layout(false),
            notifications: vec![NotificationRow {
                id: "n-1".to_string(),
                title: "Schedule update".to_string(),
                message: "Lesson moved.".to_string(),
                kind: "info",
                created_at: "10/03/2025 18:00".to_string(),
                read: false,
            }],
        };

        // When
        let html = template.render().expect("render");

        // Then
        assert!(html.contains("Schedule update"));
        assert!(html.contains(r#"action="/notifications/n-1/read""#));
        assert!(!html.contains(r#"href="/members""#));
    }

    #[test]
    fn render_notifications__should_show_manager_links_and_badge() {
        // Given
        let template = NotificationsTemplate {
            layout: layout(true),
            notifications: Vec::new(),
        };

        // When
        let html = template.render().expect("render");

        // Then
        assert!(html.contains(r#"href="/members""#));
        assert!(html.contains(r#"<span class="badge">2</span>"#));
    }

    #[test]
    fn format_euros__should_use_two_decimals() {
        assert_eq!(format_euros(45.0), "€45.00");
        assert_eq!(format_euros(13.333), "€13.33");
    }
}
