use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Account {
    Table,
    Id,
    Email,
    Password,
    FirstName,
    LastName,
}

#[derive(Iden, Clone)]
pub enum Event {
    Table,
    Id,
    CreatorId,
    Title,
    StartTimestamp,
    EndTimestamp,
    Description,
    EventTopic,
    EventType,
    Location,
    Stars,
}
