//! Navigation targets shared by the session guard and the front ends.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    /// Task dashboard
    Dashboard,
    NewTask,
    EditTask(String),
    Bookings,
    NewBooking,
    EditBooking(String),
    BookingDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::NewTask => "/tasks/new".to_string(),
            Route::EditTask(id) => format!("/tasks/edit/{}", id),
            Route::Bookings => "/bookings".to_string(),
            Route::NewBooking => "/bookings/new".to_string(),
            Route::EditBooking(id) => format!("/bookings/edit/{}", id),
            Route::BookingDetail(id) => format!("/bookings/{}", id),
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let route = match segments.as_slice() {
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            [] | ["dashboard"] => Route::Dashboard,
            ["tasks", "new"] => Route::NewTask,
            ["tasks", "edit", id] => Route::EditTask((*id).to_string()),
            ["bookings"] => Route::Bookings,
            ["bookings", "new"] => Route::NewBooking,
            ["bookings", "edit", id] => Route::EditBooking((*id).to_string()),
            ["bookings", id] => Route::BookingDetail((*id).to_string()),
            _ => return None,
        };
        Some(route)
    }

    /// Task screens need a signed-in user; bookings and auth screens do not.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::NewTask | Route::EditTask(_)
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
