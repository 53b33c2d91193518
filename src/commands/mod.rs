// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod exporter;
pub mod recurring;
pub mod savings;
pub mod transactions;
pub mod users;
