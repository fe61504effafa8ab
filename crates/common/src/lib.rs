//! Shared pieces used by the server crate and the binary: log setup and
//! small wire types that carry no gist semantics.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
    }
}
