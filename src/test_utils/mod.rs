#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;
use time::Duration;

use crate::{AppState, JwtVerifier, OwnerId, build_router};

pub(crate) const TEST_TOKEN_SECRET: &str = "foobar";

pub(crate) fn must_create_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, TEST_TOKEN_SECRET).expect("Could not create app state.")
}

pub(crate) fn must_create_token(owner: &str) -> String {
    JwtVerifier::new(TEST_TOKEN_SECRET)
        .create_token(&OwnerId::new(owner), None, Duration::hours(1))
        .expect("Could not create token.")
}

pub(crate) fn must_create_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}
