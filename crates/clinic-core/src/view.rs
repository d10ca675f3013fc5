//! View-state for the presentation layer.
//!
//! Screen switching is a single dispatch on one enum, not string
//! identifiers threaded through component layers.

use serde::{Deserialize, Serialize};

use crate::models::Role;

/// The application's screens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Dashboard,
    Patients,
    Appointments,
    Consultations,
    Roster,
    Reports,
    Users,
}

impl Screen {
    /// Whether the screen is available to a role. User management is
    /// admin-only; everything else is open to all staff.
    pub fn allowed_for(&self, role: Role) -> bool {
        match self {
            Screen::Users => role == Role::Admin,
            _ => true,
        }
    }

    /// Screens a role may navigate to, in menu order.
    pub fn menu_for(role: Role) -> Vec<Screen> {
        [
            Screen::Dashboard,
            Screen::Patients,
            Screen::Appointments,
            Screen::Consultations,
            Screen::Roster,
            Screen::Reports,
            Screen::Users,
        ]
        .into_iter()
        .filter(|s| s.allowed_for(role))
        .collect()
    }
}

/// The single place screen changes happen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Navigator {
    current: Screen,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start on the dashboard.
    pub fn new() -> Self {
        Self {
            current: Screen::Dashboard,
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Switch screens if the role allows it; reports whether it happened.
    pub fn go_to(&mut self, screen: Screen, role: Role) -> bool {
        if !screen.allowed_for(role) {
            return false;
        }
        self.current = screen;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_dashboard() {
        assert_eq!(Navigator::new().current(), Screen::Dashboard);
    }

    #[test]
    fn test_go_to_allowed_screen() {
        let mut nav = Navigator::new();
        assert!(nav.go_to(Screen::Roster, Role::Physician));
        assert_eq!(nav.current(), Screen::Roster);
    }

    #[test]
    fn test_users_screen_is_admin_only() {
        let mut nav = Navigator::new();
        assert!(!nav.go_to(Screen::Users, Role::Receptionist));
        assert_eq!(nav.current(), Screen::Dashboard);

        assert!(nav.go_to(Screen::Users, Role::Admin));
        assert_eq!(nav.current(), Screen::Users);
    }

    #[test]
    fn test_menu_for_role() {
        let admin_menu = Screen::menu_for(Role::Admin);
        assert!(admin_menu.contains(&Screen::Users));

        let physician_menu = Screen::menu_for(Role::Physician);
        assert!(!physician_menu.contains(&Screen::Users));
        assert!(physician_menu.contains(&Screen::Roster));
    }
}
