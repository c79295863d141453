// redis 키타입 정의

//access_token => access_token:{user_id}
//refresh_token => refresh_token:{user_id}

pub enum KeyType {
    AccessToken,
    RefreshToken,
}

impl KeyType {
    pub fn get_key(&self, user_id: &str) -> String {
        match self {
            KeyType::AccessToken => format!("access_token:{}", user_id),
            KeyType::RefreshToken => format!("refresh_token:{}", user_id),
        }
    }
}
