#[cfg(test)]
use crate::features::auth::model::{AuthenticatedUser, Role};

#[cfg(test)]
use crate::features::users::services::{NewUser, UserService};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
use fake::{
    faker::internet::en::SafeEmail,
    faker::name::en::{FirstName, LastName},
    Fake,
};

#[cfg(test)]
fn fake_user(roles: Vec<Role>) -> AuthenticatedUser {
    let active_role = roles.first().copied();
    AuthenticatedUser {
        id: uuid::Uuid::new_v4(),
        email: SafeEmail().fake(),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        roles,
        active_role,
    }
}

#[cfg(test)]
pub fn client_user() -> AuthenticatedUser {
    fake_user(vec![Role::Client])
}

#[cfg(test)]
pub fn investigator_user() -> AuthenticatedUser {
    fake_user(vec![Role::Investigator])
}

#[cfg(test)]
pub fn dual_role_user() -> AuthenticatedUser {
    fake_user(vec![Role::Client, Role::Investigator])
}

/// Insert a user holding `roles` and return it as a resolved identity
#[cfg(test)]
pub async fn seed_user(pool: &sqlx::PgPool, roles: Vec<Role>) -> AuthenticatedUser {
    let (user, roles) = UserService::new(pool.clone())
        .create_with_roles(NewUser {
            email: SafeEmail().fake(),
            password_hash: "not-a-real-hash".to_string(),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            roles,
        })
        .await
        .unwrap();

    AuthenticatedUser {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        active_role: roles.first().copied(),
        roles,
    }
}

/// Wrap `router` so every request carries `user` as if the auth middleware
/// had resolved it.
#[cfg(test)]
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
