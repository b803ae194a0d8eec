pub mod schedule_json;

pub use schedule_json::{
    generate_season_json, handle_schedule_request, ApiError, ScheduleRequest, ScheduleResponse,
};
