mod booking_repo;
mod category_repo;
mod conversation_repo;
mod item_repo;
mod message_repo;
mod review_repo;
mod user_repo;

pub use booking_repo::BookingRepository;
pub use category_repo::CategoryRepository;
pub use conversation_repo::ConversationRepository;
pub use item_repo::ItemRepository;
pub use message_repo::MessageRepository;
pub use review_repo::ReviewRepository;
pub use user_repo::UserRepository;
