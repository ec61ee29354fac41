// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

// Env values used by ecobee-auth.
pub const ECOBEE_API_KEY: &str = "ECOBEE_API_KEY";
pub const ECOBEE_CACHE_FILE: &str = "ECOBEE_CACHE_FILE";
pub const ECOBEE_ENDPOINT: &str = "ECOBEE_ENDPOINT";
pub const ECOBEE_SCOPES: &str = "ECOBEE_SCOPES";

pub const DEFAULT_ENDPOINT: &str = "https://api.ecobee.com";
pub const DEFAULT_SCOPES: [&str; 2] = ["smartRead", "smartWrite"];
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(5);

/// Used as `response_type` on the authorize endpoint and `grant_type` on the
/// token endpoint, for both the pin exchange and refreshes.
pub const ECOBEE_PIN_GRANT: &str = "ecobeePin";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
