use uuid::Uuid;

pub struct PostCreateRequest {
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
}

pub struct PostUpdateRequest {
    pub title: String,
    pub body: String,
}

pub struct CommentCreateRequest {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
}
