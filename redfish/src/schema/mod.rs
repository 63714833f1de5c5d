// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typed views over resource documents
//!
//! Documents are untyped at the transport boundary; these records are the
//! typed entities the orchestration logic works with, converted immediately
//! after fetch. Views decode only the fields the client consumes and ignore
//! the rest; records that must round-trip through a staged PUT preserve
//! unknown fields in a flattened map.

pub mod account;
pub mod maintenance;
pub mod storage;
pub mod system;
