//! View routing.
//!
//! Which screen a user lands on is a pure function of their account type;
//! there is no router object and nothing here mutates state.

use crate::api::models::UserType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Buyer,
    Supplier,
    Admin,
}

impl Route {
    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Register => "Create account",
            Route::Buyer => "Buyer dashboard",
            Route::Supplier => "Supplier dashboard",
            Route::Admin => "Admin dashboard",
        }
    }
}

/// Landing route for a signed-in user.
pub fn route_for(user_type: UserType) -> Route {
    match user_type {
        UserType::Buyer => Route::Buyer,
        UserType::Supplier => Route::Supplier,
        UserType::Admin => Route::Admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_role_lands_on_its_dashboard() {
        assert_eq!(route_for(UserType::Buyer), Route::Buyer);
        assert_eq!(route_for(UserType::Supplier), Route::Supplier);
        assert_eq!(route_for(UserType::Admin), Route::Admin);
    }
}
