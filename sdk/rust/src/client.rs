use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields for a new employee. Extra fields go in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub position: String,
    pub level: String, // "junior", "mid" or "senior"
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Error returned by [`EmployeeClient`].
#[derive(Debug)]
pub enum ClientError {
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The API answered with a non-success status.
    Status { status: StatusCode, message: String },
    /// A success reply whose message carried no identifier.
    MissingId(String),
}

impl ClientError {
    /// Status code of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Status { status, message } => {
                write!(f, "Employee API returned {}: {}", status, message)
            }
            ClientError::MissingId(message) => write!(f, "No id in reply: {}", message),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct EmployeeClient {
    client: Client,
    collection_url: String,
}

impl EmployeeClient {
    /// `collection_url` is the collection root, e.g. `http://localhost:5200/employees`.
    pub fn new(collection_url: &str) -> Self {
        Self {
            client: Client::new(),
            collection_url: collection_url.trim_end_matches('/').to_string(),
        }
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    /// Every employee document.
    pub async fn list(&self) -> Result<Vec<Value>, ClientError> {
        let resp = self.client.get(&self.collection_url).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// One employee document.
    pub async fn get(&self, id: &str) -> Result<Value, ClientError> {
        let resp = self.client.get(self.item_url(id)).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Create an employee from any JSON body and return the new id.
    pub async fn create_raw(&self, body: &Value) -> Result<String, ClientError> {
        self.post_for_id(body).await
    }

    /// Create an employee and return the new id.
    pub async fn create(&self, employee: &NewEmployee) -> Result<String, ClientError> {
        self.post_for_id(employee).await
    }

    async fn post_for_id<T: Serialize + ?Sized>(&self, body: &T) -> Result<String, ClientError> {
        let resp = self.client.post(&self.collection_url).json(body).send().await?;
        let message = check(resp).await?.text().await?;
        extract_id(&message).ok_or(ClientError::MissingId(message))
    }

    /// Merge `fields` into an employee. Returns the server's message.
    pub async fn update(&self, id: &str, fields: &Value) -> Result<String, ClientError> {
        let resp = self.client.put(self.item_url(id)).json(fields).send().await?;
        Ok(check(resp).await?.text().await?)
    }

    /// Delete an employee. Returns the server's message.
    pub async fn delete(&self, id: &str) -> Result<String, ClientError> {
        let resp = self.client.delete(self.item_url(id)).send().await?;
        Ok(check(resp).await?.text().await?)
    }
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(ClientError::Status { status, message })
}

/// Pull the 24 hex digit id out of "Created a new employee: ID <id>."
fn extract_id(message: &str) -> Option<String> {
    message
        .split(|c: char| !c.is_ascii_hexdigit())
        .find(|token| token.len() == 24)
        .map(str::to_string)
}
