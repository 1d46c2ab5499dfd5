use crate::model::{Region, RegionId, SubRegion};

/// Page-lifetime cache of the two boundary lists fetched at startup.
#[derive(Debug, Default)]
pub struct RegionStore {
    regions: Vec<Region>,
    sub_regions: Vec<SubRegion>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_regions(&mut self, regions: Vec<Region>) -> &[Region] {
        self.regions = regions;
        &self.regions
    }

    pub fn set_sub_regions(&mut self, sub_regions: Vec<SubRegion>) -> &[SubRegion] {
        self.sub_regions = sub_regions;
        &self.sub_regions
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn sub_regions(&self) -> &[SubRegion] {
        &self.sub_regions
    }

    // Linear scans; lists hold tens to low hundreds of entries.
    pub fn find_region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}
