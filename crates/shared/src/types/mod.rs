mod ids;
mod money;
mod time;

pub use ids::{
    order_user_pair, BookingId, CategoryId, ConversationId, ItemId, MessageId, ReviewId, UserId,
};
pub use money::round_half_up_2;
pub use time::{DateRange, DateRangeError};
