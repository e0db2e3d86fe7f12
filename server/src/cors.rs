use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, Cors, CorsOptions};

pub fn create_cors(allowed_origins: &[String]) -> Result<Cors, rocket_cors::Error> {
    CorsOptions {
        allowed_origins: AllowedOrigins::some_exact(allowed_origins),
        allowed_methods: [Method::Get, Method::Post, Method::Put, Method::Options]
            .into_iter()
            .map(Into::into)
            .collect(),
        allowed_headers: AllowedHeaders::some(&["Authorization", "Accept", "Content-Type"]),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()
}
