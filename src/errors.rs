use diesel::result::Error as DieselError;

// Errors raised while bringing the service up. Request-time failures go
// through `types::ApiError` instead.
error_chain! {
    foreign_links {
        Var(::std::env::VarError);
        R2D2(::r2d2::Error);
        Diesel(DieselError);
    }
}
