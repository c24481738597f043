//! Page controller: which page a session is on and which moves are allowed.
//!
//! LoggedOut → Welcome only through a verified login. Every signed-in page can
//! reach every other signed-in page; Admin additionally needs the Admin role.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::SignedInUser;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    LoggedOut,
    Welcome,
    RecruitmentAgent,
    SalesAgent,
    CvToCsv,
    BuildResume,
    Admin,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::LoggedOut => "Login",
            Page::Welcome => "Welcome",
            Page::RecruitmentAgent => "Recruitment Agent",
            Page::SalesAgent => "Sales Agent",
            Page::CvToCsv => "CV to CSV",
            Page::BuildResume => "Build Your Resume(WIP)",
            Page::Admin => "Admin",
        }
    }
}

const MEMBER_PAGES: [Page; 5] = [
    Page::Welcome,
    Page::RecruitmentAgent,
    Page::SalesAgent,
    Page::CvToCsv,
    Page::BuildResume,
];

/// Navigation targets for a signed-in user, in menu order.
pub fn available_pages(user: &SignedInUser) -> Vec<Page> {
    let mut pages = MEMBER_PAGES.to_vec();
    if user.is_admin() {
        pages.push(Page::Admin);
    }
    pages
}

/// Resolves a navigation request. Signing in and out are separate actions.
pub fn transition(user: Option<&SignedInUser>, target: Page) -> Result<Page, AppError> {
    let user = user.ok_or(AppError::Unauthorized)?;
    match target {
        Page::LoggedOut => Err(AppError::Validation(
            "use the logout action to leave the session".to_string(),
        )),
        Page::Admin if !user.is_admin() => Err(AppError::Forbidden),
        page => Ok(page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn user(role: Role) -> SignedInUser {
        SignedInUser {
            username: "someone".to_string(),
            role,
        }
    }

    #[test]
    fn test_logged_out_cannot_navigate() {
        for page in MEMBER_PAGES {
            assert!(matches!(transition(None, page), Err(AppError::Unauthorized)));
        }
    }

    #[test]
    fn test_member_pages_reachable_from_any_signed_in_state() {
        let recruiter = user(Role::Recruiter);
        for page in MEMBER_PAGES {
            assert_eq!(transition(Some(&recruiter), page).unwrap(), page);
        }
    }

    #[test]
    fn test_admin_page_requires_admin_role() {
        assert!(matches!(
            transition(Some(&user(Role::Recruiter)), Page::Admin),
            Err(AppError::Forbidden)
        ));
        assert_eq!(
            transition(Some(&user(Role::Admin)), Page::Admin).unwrap(),
            Page::Admin
        );
    }

    #[test]
    fn test_role_not_username_decides_admin_access() {
        let impostor = SignedInUser {
            username: "admin".to_string(),
            role: Role::Recruiter,
        };
        assert!(!available_pages(&impostor).contains(&Page::Admin));
        assert!(transition(Some(&impostor), Page::Admin).is_err());
    }

    #[test]
    fn test_navigating_to_logged_out_is_rejected() {
        assert!(matches!(
            transition(Some(&user(Role::Admin)), Page::LoggedOut),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_page_serde_names() {
        let page: Page = serde_json::from_str(r#""cv_to_csv""#).unwrap();
        assert_eq!(page, Page::CvToCsv);
        assert_eq!(Page::default(), Page::LoggedOut);
    }
}
