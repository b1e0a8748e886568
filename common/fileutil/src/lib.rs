// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

mod copy;
mod remove;
mod tempdir;

pub use crate::copy::*;
pub use crate::remove::*;
pub use tempdir::*;
