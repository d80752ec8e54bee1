//! Business logic services

pub mod availability;
pub mod booking;
pub mod booking_link;
pub mod catalog;
pub mod notification;

pub use availability::AvailabilityResolver;
pub use booking::{ActorLabels, BookingService, LifecycleOutcome};
pub use booking_link::{booking_link, BookingLinkService, ResolvedBookingLink};
pub use catalog::CatalogService;
pub use notification::{
    dispatcher_from_config, HttpNotificationDispatcher, LoggingNotificationDispatcher,
    NotificationDispatcher,
};
