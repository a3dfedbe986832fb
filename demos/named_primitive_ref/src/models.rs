use tessera::Describe;

/// A custom header value
#[derive(Describe)]
pub struct CustomHeader(pub String);

/// A custom query parameter
#[derive(Describe)]
pub struct CustomQueryParam(pub isize);

/// Request body for creating a user
#[derive(Describe)]
pub struct CreateUserBody {
    /// A custom header parameter
    pub header: CustomHeader,
    /// The user's name
    pub name: String,
}

/// Request body for updating a user
#[derive(Describe)]
pub struct UpdateUserBody {
    /// Another use of the same custom header
    pub another_header: CustomHeader,
    /// A custom query parameter
    pub query: CustomQueryParam,
}

/// Response for both operations
#[derive(Describe)]
pub struct ResponseBody {
    pub success: bool,
    pub message: String,
}
