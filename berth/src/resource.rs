/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Multi-dimensional resource quantities.
//!
//! [`ResourceVector`] is the single currency of the planner: offers grant one,
//! jobs demand one, and an [`OfferAcceptor`](crate::planner::OfferAcceptor)
//! tracks the one that is still left.
//!
//! # Numeric model
//! | Dimension | Type | Unit |
//! |---|---|---|
//! | `cpu` | `f64` | cores (fractional allowed) |
//! | `mem_mb` | `u64` | MB |
//! | `disk_mb` | `u64` | MB |
//! | `gpu` | `u32` | devices |
//! | `ports` | `u32` | port count |
//!
//! Comparisons are exact — no epsilon.  Integral CPU counts are represented
//! exactly by `f64`, so a 16-core offer holds exactly four 4-core jobs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why a resource vector could not be built or reduced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    /// A dimension was below zero.
    #[error("resource dimension '{dimension}' is negative ({value})")]
    Negative { dimension: &'static str, value: f64 },

    /// CPU was NaN or infinite.
    #[error("resource dimension '{dimension}' is not a finite number")]
    NotFinite { dimension: &'static str },

    /// `subtract` was called with a demand that does not fit.
    #[error("insufficient '{dimension}': required {required}, available {available}")]
    Insufficient {
        dimension: &'static str,
        required: f64,
        available: f64,
    },
}

// ── ResourceVector ────────────────────────────────────────────────────────────

/// A non-negative quantity of CPU, memory, disk, GPUs and ports.
///
/// Fields are private so every value in circulation has passed validation;
/// use [`ResourceVector::new`] or [`ResourceVector::builder`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawResources", into = "RawResources")]
pub struct ResourceVector {
    cpu: f64,
    mem_mb: u64,
    disk_mb: u64,
    gpu: u32,
    ports: u32,
}

impl ResourceVector {
    /// The empty vector.  Fits inside every other vector.
    pub const ZERO: ResourceVector = ResourceVector {
        cpu: 0.0,
        mem_mb: 0,
        disk_mb: 0,
        gpu: 0,
        ports: 0,
    };

    /// CPU / memory / disk vector with no GPUs or ports.
    ///
    /// # Errors
    /// [`ResourceError::Negative`] or [`ResourceError::NotFinite`] for an
    /// invalid `cpu`.
    pub fn new(cpu: f64, mem_mb: u64, disk_mb: u64) -> Result<Self, ResourceError> {
        Self::builder(cpu, mem_mb, disk_mb).build()
    }

    /// Start a builder for a vector that also carries GPUs and/or ports.
    pub fn builder(cpu: f64, mem_mb: u64, disk_mb: u64) -> ResourceVectorBuilder {
        ResourceVectorBuilder {
            cpu,
            mem_mb,
            disk_mb,
            gpu: 0,
            ports: 0,
        }
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn mem_mb(&self) -> u64 {
        self.mem_mb
    }

    pub fn disk_mb(&self) -> u64 {
        self.disk_mb
    }

    pub fn gpu(&self) -> u32 {
        self.gpu
    }

    pub fn ports(&self) -> u32 {
        self.ports
    }

    /// `true` iff every dimension of `demand` is ≤ the same dimension of
    /// `self`.
    pub fn fits(&self, demand: &ResourceVector) -> bool {
        self.first_shortfall(demand).is_none()
    }

    /// Component-wise `self - demand`.
    ///
    /// # Errors
    /// [`ResourceError::Insufficient`] naming the first dimension (in the
    /// order cpu, mem, disk, gpu, ports) where `demand` exceeds `self`.
    pub fn subtract(&self, demand: &ResourceVector) -> Result<ResourceVector, ResourceError> {
        if let Some(err) = self.first_shortfall(demand) {
            return Err(err);
        }
        Ok(ResourceVector {
            cpu: self.cpu - demand.cpu,
            mem_mb: self.mem_mb - demand.mem_mb,
            disk_mb: self.disk_mb - demand.disk_mb,
            gpu: self.gpu - demand.gpu,
            ports: self.ports - demand.ports,
        })
    }

    /// Component-wise sum.  Integer dimensions saturate.
    pub fn add(&self, other: &ResourceVector) -> ResourceVector {
        ResourceVector {
            cpu: self.cpu + other.cpu,
            mem_mb: self.mem_mb.saturating_add(other.mem_mb),
            disk_mb: self.disk_mb.saturating_add(other.disk_mb),
            gpu: self.gpu.saturating_add(other.gpu),
            ports: self.ports.saturating_add(other.ports),
        }
    }

    /// Component-wise minimum — the largest vector that fits in both.
    pub fn min(&self, other: &ResourceVector) -> ResourceVector {
        ResourceVector {
            cpu: self.cpu.min(other.cpu),
            mem_mb: self.mem_mb.min(other.mem_mb),
            disk_mb: self.disk_mb.min(other.disk_mb),
            gpu: self.gpu.min(other.gpu),
            ports: self.ports.min(other.ports),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    fn first_shortfall(&self, demand: &ResourceVector) -> Option<ResourceError> {
        let checks: [(&'static str, f64, f64); 5] = [
            ("cpu", demand.cpu, self.cpu),
            ("mem_mb", demand.mem_mb as f64, self.mem_mb as f64),
            ("disk_mb", demand.disk_mb as f64, self.disk_mb as f64),
            ("gpu", demand.gpu as f64, self.gpu as f64),
            ("ports", demand.ports as f64, self.ports as f64),
        ];
        // Integer dimensions are compared on their native type; the f64 copies
        // above are only for the error payload.
        let short = [
            demand.cpu > self.cpu,
            demand.mem_mb > self.mem_mb,
            demand.disk_mb > self.disk_mb,
            demand.gpu > self.gpu,
            demand.ports > self.ports,
        ];
        short
            .iter()
            .zip(checks)
            .find(|(is_short, _)| **is_short)
            .map(|(_, (dimension, required, available))| ResourceError::Insufficient {
                dimension,
                required,
                available,
            })
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cpu={} mem={}MB disk={}MB",
            self.cpu, self.mem_mb, self.disk_mb
        )?;
        if self.gpu > 0 {
            write!(f, " gpu={}", self.gpu)?;
        }
        if self.ports > 0 {
            write!(f, " ports={}", self.ports)?;
        }
        Ok(())
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder returned by [`ResourceVector::builder`].  Validation happens in
/// [`build`](Self::build).
#[derive(Debug, Clone, Copy)]
pub struct ResourceVectorBuilder {
    cpu: f64,
    mem_mb: u64,
    disk_mb: u64,
    gpu: u32,
    ports: u32,
}

impl ResourceVectorBuilder {
    pub fn gpu(mut self, gpu: u32) -> Self {
        self.gpu = gpu;
        self
    }

    pub fn ports(mut self, ports: u32) -> Self {
        self.ports = ports;
        self
    }

    pub fn build(self) -> Result<ResourceVector, ResourceError> {
        if !self.cpu.is_finite() {
            return Err(ResourceError::NotFinite { dimension: "cpu" });
        }
        if self.cpu < 0.0 {
            return Err(ResourceError::Negative {
                dimension: "cpu",
                value: self.cpu,
            });
        }
        Ok(ResourceVector {
            // Normalise -0.0 so equality with ZERO holds.
            cpu: self.cpu + 0.0,
            mem_mb: self.mem_mb,
            disk_mb: self.disk_mb,
            gpu: self.gpu,
            ports: self.ports,
        })
    }
}

// ── Serde representation ──────────────────────────────────────────────────────

/// On-disk shape of a resource vector.  Only `cpu` and `mem_mb` are required.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawResources {
    cpu: f64,
    mem_mb: u64,
    #[serde(default)]
    disk_mb: u64,
    #[serde(default)]
    gpu: u32,
    #[serde(default)]
    ports: u32,
}

impl TryFrom<RawResources> for ResourceVector {
    type Error = ResourceError;

    fn try_from(raw: RawResources) -> Result<Self, Self::Error> {
        ResourceVector::builder(raw.cpu, raw.mem_mb, raw.disk_mb)
            .gpu(raw.gpu)
            .ports(raw.ports)
            .build()
    }
}

impl From<ResourceVector> for RawResources {
    fn from(v: ResourceVector) -> Self {
        RawResources {
            cpu: v.cpu,
            mem_mb: v.mem_mb,
            disk_mb: v.disk_mb,
            gpu: v.gpu,
            ports: v.ports,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
