// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tracing setup for hosts embedding the library.

use crate::config::Config;
use crate::engine_core::errors::AccessError;

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` wins over `config.log_level`. Fails if a global subscriber is
/// already installed.
pub fn init_tracing(config: &Config) -> Result<(), AccessError> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("event_guard=debug,info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    let result = if config.log_format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    result.map_err(|e| AccessError::ConfigurationError(format!("tracing: {}", e)))
}
