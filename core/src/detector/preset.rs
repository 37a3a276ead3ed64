use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::prelude::AntennaResult;
use crate::response::{load_response_file, ResponseTable};

/// ARA antenna flavours; each uses its own measured response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarization {
    /// Bicone ("birdcage") antenna.
    Vpol,
    /// Quad-slot antenna.
    Hpol,
}

/// Response tables loaded once at startup and shared by every antenna of a flavour.
#[derive(Debug, Clone)]
pub struct ResponseTables {
    vpol: Arc<ResponseTable>,
    hpol: Arc<ResponseTable>,
}

impl ResponseTables {
    pub fn new(vpol: ResponseTable, hpol: ResponseTable) -> Self {
        Self {
            vpol: Arc::new(vpol),
            hpol: Arc::new(hpol),
        }
    }

    /// Both flavours with a flat unity response.
    pub fn flat() -> Self {
        Self::new(ResponseTable::flat(), ResponseTable::flat())
    }

    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(vpol: P, hpol: Q) -> AntennaResult<Self> {
        Ok(Self::new(load_response_file(vpol)?, load_response_file(hpol)?))
    }

    pub fn table(&self, polarization: Polarization) -> Arc<ResponseTable> {
        match polarization {
            Polarization::Vpol => Arc::clone(&self.vpol),
            Polarization::Hpol => Arc::clone(&self.hpol),
        }
    }
}
