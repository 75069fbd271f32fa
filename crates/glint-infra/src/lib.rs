// Copyright 2025 eraflo
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

//! # Glint Infra
//!
//! Concrete implementations of the driver contract declared in `glint-core`.
//!
//! - [`HeadlessDevice`]: a software driver with no GPU requirement, used by
//!   tests and offline tools.
//! - `GlowDevice`: an OpenGL / OpenGL ES driver over a `glow` context,
//!   available with the `glow` feature.

#![warn(missing_docs)]

pub mod graphics;

pub use graphics::headless::{HeadlessDevice, RecordedUpload, UploadValue, HEADLESS_BINARY_FORMAT};

#[cfg(feature = "glow")]
pub use graphics::opengl::{detect_capabilities, GlowDevice};
