// This file is part of chainindex.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::num::NonZeroU64;

/// Offset-based pagination request: one-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: NonZeroU64,
    pub limit: NonZeroU64,
}

impl Pagination {
    pub fn new(page: NonZeroU64, limit: NonZeroU64) -> Self {
        Self { page, limit }
    }

    /// Number of records to skip, saturating for pages far beyond any realistic record count.
    pub fn offset(&self) -> u64 {
        (self.page.get() - 1).saturating_mul(self.limit.get())
    }
}

/// Pagination state of a listing: total number of records and pages, the current page and its
/// size.
///
/// A page beyond the last one is not an error: it yields no records, but still reports the
/// totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationResult {
    pub total_record: u64,
    pub total_page: u64,
    pub current_page: u64,
    pub limit: u64,
}

impl PaginationResult {
    pub fn new(total_record: u64, pagination: Pagination) -> Self {
        let Pagination { page, limit } = pagination;

        Self {
            total_record,
            total_page: total_record.div_ceil(limit.get()),
            current_page: page.get(),
            limit: limit.get(),
        }
    }
}
