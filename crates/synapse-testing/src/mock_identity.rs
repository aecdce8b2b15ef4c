//! Scripted identity client.

use parking_lot::Mutex;

use synapse_auth::{Account, AuthError, DeviceCodeFlow, IdentityClient, TokenResult};

#[derive(Default)]
struct CallLog {
    silent_calls: usize,
    initiate_calls: usize,
    complete_calls: usize,
    initiated_scopes: Vec<String>,
}

/// An [`IdentityClient`] that replays scripted outcomes and records calls.
///
/// Unscripted steps fail loudly with [`AuthError::Configuration`] so a test
/// that wanders off its expected path is caught rather than hung.
pub struct ScriptedIdentityClient {
    accounts: Vec<Account>,
    silent: Option<TokenResult>,
    flow: Option<DeviceCodeFlow>,
    completion: Option<TokenResult>,
    log: Mutex<CallLog>,
}

impl ScriptedIdentityClient {
    /// A client with no cached accounts and nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            silent: None,
            flow: None,
            completion: None,
            log: Mutex::new(CallLog::default()),
        }
    }

    /// Add a cached account.
    #[must_use]
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Script the silent-acquisition outcome (unset means "nothing usable").
    #[must_use]
    pub fn with_silent_result(mut self, result: TokenResult) -> Self {
        self.silent = Some(result);
        self
    }

    /// Script the flow descriptor returned by device-flow initiation.
    #[must_use]
    pub fn with_flow(mut self, flow: DeviceCodeFlow) -> Self {
        self.flow = Some(flow);
        self
    }

    /// Script the device-flow completion outcome.
    #[must_use]
    pub fn with_completion(mut self, result: TokenResult) -> Self {
        self.completion = Some(result);
        self
    }

    /// How many silent acquisitions were attempted.
    #[must_use]
    pub fn silent_calls(&self) -> usize {
        self.log.lock().silent_calls
    }

    /// How many device flows were initiated.
    #[must_use]
    pub fn initiate_calls(&self) -> usize {
        self.log.lock().initiate_calls
    }

    /// How many device-flow completions were awaited.
    #[must_use]
    pub fn complete_calls(&self) -> usize {
        self.log.lock().complete_calls
    }

    /// Scopes passed to device-flow initiation, in call order.
    #[must_use]
    pub fn initiated_scopes(&self) -> Vec<String> {
        self.log.lock().initiated_scopes.clone()
    }
}

impl Default for ScriptedIdentityClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityClient for ScriptedIdentityClient {
    fn cached_accounts(&self) -> Vec<Account> {
        self.accounts.clone()
    }

    async fn acquire_token_silent(&self, _scope: &str, _account: &Account) -> Option<TokenResult> {
        self.log.lock().silent_calls += 1;
        self.silent.clone()
    }

    async fn initiate_device_flow(&self, scope: &str) -> Result<DeviceCodeFlow, AuthError> {
        let mut log = self.log.lock();
        log.initiate_calls += 1;
        log.initiated_scopes.push(scope.to_string());
        self.flow
            .clone()
            .ok_or_else(|| AuthError::Configuration("no scripted device flow".into()))
    }

    async fn complete_device_flow(&self, _flow: &DeviceCodeFlow) -> Result<TokenResult, AuthError> {
        self.log.lock().complete_calls += 1;
        self.completion
            .clone()
            .ok_or_else(|| AuthError::Configuration("no scripted completion result".into()))
    }
}
