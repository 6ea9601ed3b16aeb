pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::content::handlers as content;
use crate::cover_letter::handlers as cover_letter;
use crate::documents::handlers as documents;
use crate::engagement::handlers as engagement;
use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/register", post(accounts::handle_register))
        .route("/login", post(accounts::handle_login))
        .route("/get-users", get(accounts::handle_list_users))
        .route("/update-user", patch(accounts::handle_update_user))
        .route("/delete-user/:id", delete(accounts::handle_delete_user))
        .route("/forgot-password", post(accounts::handle_forgot_password))
        .route(
            "/reset-password/:token",
            post(accounts::handle_reset_password),
        )
        .route("/getprofile", get(accounts::handle_get_profile))
        .route("/updateprofile", patch(accounts::handle_update_profile))
        // Posts
        .route("/getposts", get(content::handle_list_posts))
        .route("/myposts", get(content::handle_my_posts))
        .route("/createpost", post(content::handle_create_post))
        .route("/update", patch(content::handle_update_post))
        .route("/delete/:id", delete(content::handle_delete_post))
        // Job posts
        .route("/getalljobposts", get(content::handle_list_job_posts))
        .route("/myjobposts", get(content::handle_my_job_posts))
        .route("/createjobpost", post(content::handle_create_job_post))
        .route("/updatejobpost", patch(content::handle_update_job_post))
        .route(
            "/deletejobpost/:id",
            delete(content::handle_delete_job_post),
        )
        // Likes & comments
        .route("/toggle/:jobId", post(engagement::handle_toggle_like))
        .route("/createcomment", post(engagement::handle_create_comment))
        .route(
            "/updatecomment/:id",
            patch(engagement::handle_update_comment),
        )
        .route(
            "/deletecomment/:id",
            delete(engagement::handle_delete_comment),
        )
        .route(
            "/postcomment/:postId",
            get(engagement::handle_list_comments),
        )
        // Documents
        .route("/uploadresume", post(documents::handle_upload_resume))
        .route("/myresumes", get(documents::handle_my_resumes))
        .route(
            "/deleteresume/:id",
            delete(documents::handle_delete_resume),
        )
        .route(
            "/generatecoverletter",
            post(cover_letter::handle_generate_cover_letter),
        )
        .route("/savecoverletter", post(documents::handle_save_cover_letter))
        .route("/mycoverletters", get(documents::handle_my_cover_letters))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api_routes())
        .with_state(state)
}
