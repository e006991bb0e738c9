use rand::{distributions::Alphanumeric, Rng};

/// 혼동하기 쉬운 문자(0/O, 1/I)를 제외한 초대 코드 문자 집합
const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const INVITE_CODE_LENGTH: usize = 8;
const SHARE_CODE_LENGTH: usize = 24;
const SLUG_SUFFIX_LENGTH: usize = 6;

/// 팀 초대 코드 (대문자, 대소문자 구분 없이 비교)
pub fn invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| INVITE_CODE_CHARSET[rng.gen_range(0..INVITE_CODE_CHARSET.len())] as char)
        .collect()
}

/// 공개 게임 공유 코드 (추측 불가능한 토큰)
pub fn share_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// 이름으로부터 URL 슬러그를 만들고 충돌 방지용 접미사를 붙입니다.
pub fn slug(name: &str) -> String {
    let mut base = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            base.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            base.push('-');
            last_dash = true;
        }
    }
    let base = base.trim_end_matches('-');

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SLUG_SUFFIX_LENGTH)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_code_should_be_uppercase_and_unambiguous() {
        let code = invite_code();

        assert_eq!(code.len(), INVITE_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert!(!code.contains('O') && !code.contains('0'));
    }

    #[test]
    fn slug_should_normalize_name() {
        let slug = slug("Spring Fling: Finals!");

        assert!(slug.starts_with("spring-fling-finals-"));
        assert_eq!(slug.len(), "spring-fling-finals-".len() + SLUG_SUFFIX_LENGTH);
    }

    #[test]
    fn slug_of_symbols_only_should_be_suffix() {
        assert_eq!(slug("!!!").len(), SLUG_SUFFIX_LENGTH);
    }

    #[test]
    fn share_codes_should_differ() {
        assert_ne!(share_code(), share_code());
    }
}
