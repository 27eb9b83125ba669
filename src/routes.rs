use std::sync::Arc;

use log::{error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::BackendError;

pub mod admin;
mod handlers;
mod query;
mod rejection;
mod response;

pub use internal::*;

/// The largest submission body to accept. Forms are small JSON
/// documents; images are referenced by URL.
const MAX_CONTENT_LENGTH: u64 = 64 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(logger, "Backend error"; "context" => ?r.context, "error" => ?r.error, "status" => %status_code_for(e), "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        InvalidId { .. } | MalformedSubmission(..) | UnknownValue { .. } => {
            StatusCode::BAD_REQUEST
        }
        InvalidSubmission(..) => StatusCode::UNPROCESSABLE_ENTITY,
        NonExistentId(..) => StatusCode::NOT_FOUND,
        NotAuthenticated => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::body::{bytes, content_length_limit};
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{get as g, path as p, path::param as par, post, query};

    use super::{handlers, query::FilterQuery, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
        ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
        ($route_variable:ident; $first:expr, $($rest:expr),+) => (
            let $route_variable = $route_variable.and($first);
            route_filter!($route_variable; $($rest),+);
        )
    }

    macro_rules! route {
        ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
            pub fn $name(environment: Environment) -> Route {
                let r = environment.urls.pets_path.clone();

                let $route_variable = warp::any()
                    .map(move || environment.clone())
                    .and(p(r));

                route_filter!($route_variable; $($filters),+);

                $route_variable.and_then(handlers::$handler)
                    .boxed()
            }
        );
    }

    route!(make_list_route => list, rt; end(), g(), query::<FilterQuery>());
    route!(make_featured_route => featured, rt; p("featured"), end(), g(), query::<FilterQuery>());
    route!(make_retrieve_route => retrieve, rt; p("id"), par::<String>(), end(), g());
    route!(make_create_route => create, rt; end(), post(), content_length_limit(MAX_CONTENT_LENGTH), bytes());
    route!(make_request_route => request, rt; p("id"), par::<String>(), p("requests"), end(), post(), content_length_limit(MAX_CONTENT_LENGTH), bytes());

    /// Contact messages are not about any one pet, so they live outside
    /// the pets path.
    pub fn make_contact_route(environment: Environment) -> Route {
        warp::any()
            .map(move || environment.clone())
            .and(p("contact"))
            .and(end())
            .and(post())
            .and(content_length_limit(MAX_CONTENT_LENGTH))
            .and(bytes())
            .and_then(handlers::contact)
            .boxed()
    }
}
