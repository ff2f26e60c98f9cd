// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod assets;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod reports;
pub mod seed;
pub mod transactions;
pub mod values;
