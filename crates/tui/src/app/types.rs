use carbon_signal_api::ApiResult;

use crate::report::RegionReport;

pub enum AppAsyncEvent {
    ReportFinished {
        region_code: String,
        outcome: ApiResult<RegionReport>,
    },
}
