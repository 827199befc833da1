use std::collections::HashMap;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;
use crate::error::{PortalError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const MAX_REDIRECTS: usize = 5;

/// One logged-in session with the exam portal. The client's cookie jar carries the session.
pub struct PortalClient {
    client: Client,
    base_url: Url,
}

impl PortalClient {
    pub fn new(base_url: Url) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(referer) = HeaderValue::from_str(base_url.join("login.jsp")?.as_str()) {
            headers.insert(REFERER, referer);
        }

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    // Opens the login page to get a session cookie, then downloads the captcha image for that session.
    pub async fn fetch_captcha(&self) -> Result<Vec<u8>> {
        let login_page = self.client.get(self.endpoint("login.jsp")?).send().await?;
        debug!("Login page answered {}", login_page.status());

        let captcha = self.client.get(self.endpoint("captcha.jsp")?).send().await?;
        let bytes = captcha.bytes().await?;
        info!("Captcha retrieved ({} bytes)", bytes.len());
        Ok(bytes.to_vec())
    }

    // Submits the login form. The portal answers 200 either way, so failure is read from the body.
    pub async fn login(&self, enrollment_no: &str, password: &str, captcha: &str) -> Result<()> {
        for (field, value) in [("enrollmentNo", enrollment_no), ("password", password), ("captcha", captcha)] {
            if value.trim().is_empty() {
                return Err(PortalError::MissingField(field));
            }
        }

        let login_data = HashMap::from([
            ("enrollmentNo", enrollment_no),
            ("password", password),
            ("captcha", captcha),
            ("submit", "Submit"),
        ]);
        let body = self
            .client
            .post(self.endpoint("studentlogin.do")?)
            .form(&login_data)
            .send()
            .await?
            .text()
            .await?;

        if body.contains("Invalid") || body.contains("incorrect") {
            return Err(PortalError::InvalidCredentials);
        }
        info!("Logged in as {}", enrollment_no);
        Ok(())
    }

    pub async fn fetch_result_page(&self) -> Result<String> {
        let response = self.client.get(self.endpoint("view-result.do")?).send().await?;
        debug!("Result page answered {}", response.status());
        Ok(response.text().await?)
    }
}
