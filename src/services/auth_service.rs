use axum::http::{self};

// Get the admin token from a request
pub fn get_admin_token<B>(req: &http::Request<B>) -> Result<String, String> {
    // 1. Try to get token from Authorization header
    if let Some(auth_header) = req.headers().get(http::header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| "Invalid Authorization header".to_string())?;
        Ok(auth_str
            .strip_prefix("Bearer ")
            .unwrap_or(auth_str)
            .to_string())
    }
    // 2. Try to get token from cookies
    else {
        let cookie_header = req.headers().get(http::header::COOKIE)
            .ok_or_else(|| "Missing Authorization header or Cookie".to_string())?
            .to_str()
            .map_err(|_| "Invalid Cookie header".to_string())?;

        for cookie in cookie::Cookie::split_parse(cookie_header) {
            if let Ok(c) = cookie {
                if c.name() == "admin_session" {
                    return Ok(c.value().to_string());
                }
            }
        }
        Err("admin_session cookie not found".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn bearer_header_wins() {
        let req = Request::builder()
            .header(http::header::AUTHORIZATION, "Bearer sekrit")
            .body(())
            .unwrap();
        assert_eq!(get_admin_token(&req).unwrap(), "sekrit");
    }

    #[test]
    fn falls_back_to_the_session_cookie() {
        let req = Request::builder()
            .header(http::header::COOKIE, "theme=dark; admin_session=sekrit")
            .body(())
            .unwrap();
        assert_eq!(get_admin_token(&req).unwrap(), "sekrit");
    }

    #[test]
    fn missing_credentials_are_an_error() {
        let req = Request::builder().body(()).unwrap();
        assert!(get_admin_token(&req).is_err());
    }
}
