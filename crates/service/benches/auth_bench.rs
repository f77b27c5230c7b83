use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::{domain::LoginInput, jwt::AuthConfig, token_store::InMemoryRefreshTokenStore, AuthService};
use service::user::{domain::SignUpInput, repository::mock::InMemoryUserRepository, UserService};

fn bench_login(c: &mut Criterion) {
    let users = Arc::new(InMemoryUserRepository::default());
    let tokens = Arc::new(InMemoryRefreshTokenStore::new());
    let accounts = UserService::new(users.clone(), tokens.clone());
    let auth = AuthService::new(users, tokens, AuthConfig::with_secrets("bench-access", "bench-refresh"));

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(accounts.sign_up(SignUpInput {
        email: "bench@example.com".into(),
        password: "Benchmark1".into(),
        cellphone: None,
    }))
    .unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            rt.block_on(auth.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() }))
                .unwrap();
        });
    });

    let session = rt
        .block_on(auth.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() }))
        .unwrap();
    let header = format!("Bearer {}", session.tokens.access_token);
    c.bench_function("auth_authenticate_bearer", |b| {
        b.iter(|| {
            rt.block_on(auth.authenticate(Some(&header))).unwrap();
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
