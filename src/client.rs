//! # Orchestrator API Client
//!
//! Session-holding HTTP client for the orchestrator's REST/OData API.
//! Provides one method per remote operation: folders, releases, jobs, queues,
//! machines and robots.
//!
//! A client starts unauthenticated and becomes authenticated exactly once.
//! Every operation checks for the session token before touching the network.

use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::auth::{request_token, AuthMode, BearerToken, Credentials};
use crate::config::ClientConfig;
use crate::error::{server_message, ClientError, ClientResult};
use crate::models::{
    AddQueueItemRequest, ContentMap, CreateMachineRequest, Folder, JobRecord, NewRobot, QueueItem,
    ReleaseRecord, StartJobsRequest, StartTransactionRequest, StopJobRequest, StopStrategy,
};
use crate::odata::{self, ODataCollection, FOLDER_HEADER};

/// Authenticated session state
#[derive(Debug, Clone)]
pub struct Session {
    mode: AuthMode,
    token: BearerToken,
}

impl Session {
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }
}

/// HTTP client for the orchestrator API
///
/// # Examples
///
/// ```rust,no_run
/// use orchestrator_client::{ClientConfig, Credentials, Folder, OrchestratorClient};
///
/// # async fn example() -> orchestrator_client::ClientResult<()> {
/// let config = ClientConfig::new("https://cloud.uipath.com", "acme", "DefaultTenant");
/// let credentials = Credentials::oauth("client-id", "client-secret", "OR.Queues OR.Jobs");
/// let client = OrchestratorClient::connect(config, credentials).await?;
///
/// let folders = client.list_folders().await?;
/// let shared = folders
///     .into_iter()
///     .find(|f| f.fully_qualified_name == "Shared")
///     .unwrap_or_else(|| Folder::new(1, "Shared"));
///
/// let key = client.get_release_key(&shared, "InvoiceProcessing").await?;
/// client.start_job(&key, &shared, None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OrchestratorClient {
    client: Client,
    config: ClientConfig,
    session: Option<Session>,
}

impl std::fmt::Debug for OrchestratorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorClient")
            .field("base_url", &self.config.base_url)
            .field("organization", &self.config.organization)
            .field("tenant", &self.config.tenant)
            .field("timeout_ms", &self.config.timeout_ms)
            .field("auth_mode", &self.session.as_ref().map(Session::mode))
            .finish()
    }
}

impl OrchestratorClient {
    /// Create an unauthenticated client
    ///
    /// Validates the configuration and prepares the HTTP client. No request is
    /// made; call [`OrchestratorClient::authenticate`] before any operation.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        if config.accept_invalid_certs {
            warn!(base_url = %config.base_url, "TLS certificate validation is disabled");
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!(
                "uipath-orchestrator-client/{}",
                env!("CARGO_PKG_VERSION")
            ))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::config_error(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            organization = %config.organization,
            tenant = %config.tenant,
            timeout_ms = config.timeout_ms,
            "Created orchestrator client"
        );

        Ok(Self {
            client,
            config,
            session: None,
        })
    }

    /// Create a client and authenticate it in one step
    pub async fn connect(config: ClientConfig, credentials: Credentials) -> ClientResult<Self> {
        Self::new(config)?.authenticate(credentials).await
    }

    /// Authenticate the client, returning it ready for use
    ///
    /// The session token is set once; authenticating an already authenticated
    /// client is rejected.
    pub async fn authenticate(mut self, credentials: Credentials) -> ClientResult<Self> {
        if self.session.is_some() {
            return Err(ClientError::InvalidInput(
                "client is already authenticated".to_string(),
            ));
        }

        let token =
            request_token(&self.client, self.config.trimmed_base_url(), &credentials).await?;
        self.session = Some(Session {
            mode: credentials.mode(),
            token,
        });
        Ok(self)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the configured base URL for debugging/logging
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // ===================================================================================
    // FOLDERS
    // ===================================================================================

    /// List every folder visible to the session
    ///
    /// GET odata/Folders
    pub async fn list_folders(&self) -> ClientResult<Vec<Folder>> {
        let request = self.request(Method::GET, odata::FOLDERS_PATH, None)?;
        let collection: ODataCollection<Folder> = self
            .execute_json(request, StatusCode::OK, "list folders")
            .await?;

        let folders = collection.into_records()?;
        debug!(count = folders.len(), "Listed folders");
        Ok(folders)
    }

    // ===================================================================================
    // RELEASES AND JOBS
    // ===================================================================================

    /// Resolve the key of the first release whose name contains `job_name`
    ///
    /// GET odata/Releases?$filter=contains(Name,'{job_name}')
    pub async fn get_release_key(&self, folder: &Folder, job_name: &str) -> ClientResult<String> {
        let request = self
            .request(Method::GET, odata::RELEASES_PATH, Some(folder))?
            .query(&[("$filter", odata::contains_filter("Name", job_name))]);
        let collection: ODataCollection<ReleaseRecord> = self
            .execute_json(request, StatusCode::OK, "get release key")
            .await?;

        let release = collection
            .into_records()?
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::not_found("Release", job_name))?;

        debug!(job_name = %job_name, folder_id = folder.id, "Resolved release key");
        Ok(release.key)
    }

    /// Start a job for a release, optionally passing input arguments
    ///
    /// POST odata/Jobs/UiPath.Server.Configuration.OData.StartJobs
    pub async fn start_job(
        &self,
        release_key: &str,
        folder: &Folder,
        inputs: Option<ContentMap>,
    ) -> ClientResult<()> {
        let request = self
            .request(Method::POST, odata::START_JOBS_PATH, Some(folder))?
            .json(&StartJobsRequest::new(release_key, inputs));
        self.execute(request, StatusCode::CREATED, "start job")
            .await?;

        info!(release_key = %release_key, folder_id = folder.id, "Robot job started");
        Ok(())
    }

    /// Id of the first running job whose release name contains `release_name`
    ///
    /// GET odata/Jobs?$filter=contains(ReleaseName,'{release_name}') and State eq 'Running'
    pub async fn find_running_job_id(&self, release_name: &str) -> ClientResult<i64> {
        let request = self
            .request(Method::GET, odata::JOBS_PATH, None)?
            .query(&[("$filter", odata::running_jobs_filter(release_name))]);
        let collection: ODataCollection<JobRecord> = self
            .execute_json(request, StatusCode::OK, "find running job")
            .await?;

        collection
            .into_records()?
            .into_iter()
            .next()
            .map(|job| job.id)
            .ok_or_else(|| ClientError::not_found("Running job", release_name))
    }

    /// Kill the running job of a release
    ///
    /// Looks the job up first; when nothing is running no stop command is sent.
    pub async fn stop_job(&self, release_name: &str) -> ClientResult<()> {
        let job_id = self.find_running_job_id(release_name).await?;

        let request = self
            .request(Method::POST, &odata::stop_job_path(job_id), None)?
            .json(&StopJobRequest {
                strategy: StopStrategy::Kill,
            });
        self.execute(request, StatusCode::OK, "stop job").await?;

        info!(release_name = %release_name, job_id, "Robot job terminated");
        Ok(())
    }

    // ===================================================================================
    // QUEUES
    // ===================================================================================

    /// Start the next transaction of a queue
    ///
    /// POST odata/Queues/UiPathODataSvc.StartTransaction
    pub async fn start_transaction(&self, queue_name: &str) -> ClientResult<()> {
        let request = self
            .request(Method::POST, odata::START_TRANSACTION_PATH, None)?
            .json(&StartTransactionRequest::new(queue_name));
        self.execute(request, StatusCode::NO_CONTENT, "start transaction")
            .await?;

        info!(queue_name = %queue_name, "Transaction started");
        Ok(())
    }

    /// Add an item to a queue, returning the created item
    ///
    /// POST odata/Queues/UiPathODataSvc.AddQueueItem
    pub async fn add_queue_item(
        &self,
        queue_name: &str,
        folder: &Folder,
        reference: &str,
        item: &ContentMap,
    ) -> ClientResult<QueueItem> {
        let request = self
            .request(Method::POST, odata::ADD_QUEUE_ITEM_PATH, Some(folder))?
            .json(&AddQueueItemRequest::new(queue_name, reference, item));
        let queue_item: QueueItem = self
            .execute_json(request, StatusCode::CREATED, "add queue item")
            .await?;

        info!(
            queue_name = %queue_name,
            reference = %reference,
            queue_item_id = queue_item.id,
            "Queue item added"
        );
        Ok(queue_item)
    }

    /// Fetch a queue item, including its processing status
    ///
    /// GET odata/QueueItems({item_id})
    pub async fn get_queue_item_status(
        &self,
        item_id: i64,
        folder: &Folder,
    ) -> ClientResult<QueueItem> {
        let request = self.request(Method::GET, &odata::queue_item_path(item_id), Some(folder))?;
        let queue_item: QueueItem = self
            .execute_json(request, StatusCode::OK, "get queue item status")
            .await?;

        debug!(
            queue_item_id = item_id,
            status = queue_item.status().unwrap_or("unknown"),
            "Fetched queue item"
        );
        Ok(queue_item)
    }

    // ===================================================================================
    // PROVISIONING
    // ===================================================================================

    /// Create a standard machine
    ///
    /// POST odata/Machines
    pub async fn create_machine(&self, name: &str, description: &str) -> ClientResult<()> {
        let request = self
            .request(Method::POST, odata::MACHINES_PATH, None)?
            .json(&CreateMachineRequest::new(name, description));
        self.execute(request, StatusCode::CREATED, "create machine")
            .await?;

        info!(machine_name = %name, "Machine created");
        Ok(())
    }

    /// Create a robot on an existing machine
    ///
    /// POST odata/Robots
    pub async fn create_robot(&self, robot: &NewRobot) -> ClientResult<()> {
        let request = self
            .request(Method::POST, odata::ROBOTS_PATH, None)?
            .json(robot);
        self.execute(request, StatusCode::CREATED, "create robot")
            .await?;

        info!(
            robot_name = %robot.name,
            machine_name = %robot.machine_name,
            robot_type = ?robot.robot_type,
            "Robot created"
        );
        Ok(())
    }

    // ===================================================================================
    // REQUEST PLUMBING
    // ===================================================================================

    fn token(&self) -> ClientResult<&BearerToken> {
        self.session
            .as_ref()
            .map(Session::token)
            .ok_or(ClientError::NotAuthenticated)
    }

    fn odata_url(&self, path: &str) -> ClientResult<Url> {
        let raw = format!(
            "{}/{}/{}/orchestrator_/odata/{}",
            self.config.trimmed_base_url(),
            self.config.organization,
            self.config.tenant,
            path
        );
        Url::parse(&raw).map_err(|e| ClientError::config_error(format!("Failed to construct URL: {}", e)))
    }

    /// Start an authenticated request, scoped to `folder` when given
    fn request(
        &self,
        method: Method,
        path: &str,
        folder: Option<&Folder>,
    ) -> ClientResult<RequestBuilder> {
        let token = self.token()?;
        let url = self.odata_url(path)?;

        debug!(method = %method, url = %url, folder_id = folder.map(|f| f.id), "Calling orchestrator");

        let mut builder = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, token.header_value());
        if let Some(folder) = folder {
            builder = builder.header(FOLDER_HEADER, folder.id.to_string());
        }
        Ok(builder)
    }

    /// Send a request and return its body when the status is exactly `expected`
    async fn execute(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
        operation: &str,
    ) -> ClientResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == expected {
            debug!(status = %status, "Completed operation: {}", operation);
            Ok(body)
        } else {
            let message = server_message(status, &body);
            error!(status = %status, error = %message, "Failed operation: {}", operation);
            Err(ClientError::api_error(status.as_u16(), message))
        }
    }

    async fn execute_json<T>(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
        operation: &str,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(request, expected, operation).await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse {} response", operation);
            ClientError::from(e)
        })
    }
}
