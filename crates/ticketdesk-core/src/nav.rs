// Role-gated navigation.

use crate::session::Role;

/// Screens a front-end can show.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Screen {
    Login,
    Register,
    ForgotPassword,
    Home,
    Events,
    Categories,
    Cities,
    Customers,
    RegisteredEvents,
    Reminders,
    Profile,
    StudentHome,
    Recommendations,
}

const ADMIN_MENU: &[Screen] = &[
    Screen::Home,
    Screen::Events,
    Screen::Categories,
    Screen::Cities,
    Screen::Customers,
    Screen::RegisteredEvents,
    Screen::Reminders,
    Screen::Profile,
];

const STUDENT_MENU: &[Screen] = &[
    Screen::StudentHome,
    Screen::RegisteredEvents,
    Screen::Recommendations,
    Screen::Profile,
];

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::ForgotPassword => "Forgot Password",
            Self::Home | Self::StudentHome => "Home",
            Self::Events => "Events",
            Self::Categories => "Categories",
            Self::Cities => "Cities",
            Self::Customers => "Students",
            Self::RegisteredEvents => "Registered Events",
            Self::Reminders => "Reminders",
            Self::Profile => "Profile",
            Self::Recommendations => "Recommendations",
        }
    }

    /// Reachable without signing in.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::ForgotPassword)
    }
}

/// Menu entries for `role`, in display order.
pub fn menu_for(role: Option<Role>) -> &'static [Screen] {
    match role {
        Some(Role::Admin) => ADMIN_MENU,
        Some(Role::Student) => STUDENT_MENU,
        None => &[],
    }
}

/// The screen to land on after signing in.
pub fn landing(role: Option<Role>) -> Screen {
    match role {
        Some(Role::Admin) => Screen::Home,
        Some(Role::Student) => Screen::StudentHome,
        None => Screen::Login,
    }
}

pub fn can_access(role: Option<Role>, screen: Screen) -> bool {
    screen.is_public() || menu_for(role).contains(&screen)
}
