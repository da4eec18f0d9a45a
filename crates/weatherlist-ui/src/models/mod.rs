pub mod forecast_detail;
pub mod weather_list_model;
