pub struct UserCreateRequest {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
}
