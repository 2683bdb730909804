mod appointments;
mod auth;
mod booking;
mod loading;
mod notification;
mod popup;
