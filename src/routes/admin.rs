use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use log::info;
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, Reply};
use warp::Filter;

use super::response::SuccessResponse;
use crate::environment::Environment;

pub fn make_healthz_route<'a>(
    _environment: Environment,
) -> impl warp::Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone + 'a {
    warp::path("healthz").and(warp::get()).map(move || {
        json(&SuccessResponse::Healthz {
            revision: info::REVISION,
            timestamp: info::BUILD_TIMESTAMP,
            version: info::VERSION,
        })
    })
}

type TerminationFuture<'a> = BoxFuture<'a, ()>;

pub type TerminationFunctionWrapper<'a> =
    Arc<dyn Fn() -> TerminationFuture<'a> + Send + Sync + 'a>;

pub fn make_termination_route<'a>(
    environment: Environment,
    terminate: TerminationFunctionWrapper<'a>,
) -> impl warp::Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone + 'a {
    let logger = environment.logger;

    let handler = move || -> BoxFuture<Result<StatusCode, std::convert::Infallible>> {
        let terminate = terminate.clone();
        let logger = logger.clone();

        async move {
            info!(logger, "Termination requested");
            terminate().await;
            Ok(StatusCode::NO_CONTENT)
        }
        .boxed()
    };

    warp::path("terminate").and(warp::post()).and_then(handler)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use futures::future::FutureExt;
    use serde_json::Value;

    use crate::db::mock::MockDb;
    use crate::environment::{Config, Environment};
    use crate::urls::Urls;

    fn environment() -> Environment {
        Environment::new(
            Arc::new(log::discard()),
            Arc::new(MockDb::default()),
            Arc::new(Urls::new("https://shelter.example.com/", "pets", "/auth")),
            Config::default(),
        )
    }

    #[tokio::test]
    async fn healthz_reports_the_version() {
        let filter = super::make_healthz_route(environment());

        let response = warp::test::request()
            .path("/healthz")
            .method("GET")
            .reply(&filter)
            .await;

        assert_eq!(response.status().as_u16(), 200);

        let body: Value = serde_json::from_slice(response.body()).expect("parse response as JSON");
        assert_eq!(body["version"], info::VERSION);
    }

    #[tokio::test]
    async fn terminate_runs_the_termination_function() {
        let called = Arc::new(AtomicBool::new(false));
        let terminate = {
            let called = called.clone();

            Arc::new(move || {
                let called = called.clone();

                async move {
                    called.store(true, Ordering::SeqCst);
                }
                .boxed()
            })
        };

        let filter = super::make_termination_route(environment(), terminate);

        let response = warp::test::request()
            .path("/terminate")
            .method("POST")
            .reply(&filter)
            .await;

        assert_eq!(response.status().as_u16(), 204);
        assert!(called.load(Ordering::SeqCst));
    }
}
