pub mod http_booking_api;
