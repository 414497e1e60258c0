//! Initial records loaded into an empty server store.

use crate::domain::restaurant::{Category, NewRestaurant};

/// Well-known restaurants around Myeongdong, Seoul.
pub fn initial_restaurants() -> Vec<NewRestaurant> {
    vec![
        NewRestaurant {
            name: "Myeongdong Kyoja".to_string(),
            address: "25-2 Myeongdong 2-ga, Jung-gu, Seoul".to_string(),
            category: Category::Korean,
            rating: 4,
            review: Some("Famous dumpling house in Myeongdong. The big dumplings are great!".to_string()),
            latitude: 37.563692,
            longitude: 126.982814,
        },
        NewRestaurant {
            name: "Jeonju Jungang Hoegwan".to_string(),
            address: "5-1 Da-dong, Jung-gu, Seoul".to_string(),
            category: Category::Korean,
            rating: 5,
            review: Some("Traditional Korean set meals with a beautifully laid table.".to_string()),
            latitude: 37.566570,
            longitude: 126.977829,
        },
        NewRestaurant {
            name: "Starbucks Myeongdong".to_string(),
            address: "59-4 Myeongdong 1-ga, Jung-gu, Seoul".to_string(),
            category: Category::Cafe,
            rating: 4,
            review: Some("Right in the middle of Myeongdong. A good break while shopping.".to_string()),
            latitude: 37.564718,
            longitude: 126.982573,
        },
        NewRestaurant {
            name: "Gyodong Jjamppong".to_string(),
            address: "10-1 Myeongdong 1-ga, Jung-gu, Seoul".to_string(),
            category: Category::Chinese,
            rating: 4,
            review: Some("Spicy seafood noodle soup with generous toppings.".to_string()),
            latitude: 37.564289,
            longitude: 126.982041,
        },
        NewRestaurant {
            name: "Ginza Ryoko".to_string(),
            address: "54-15 Myeongdong 2-ga, Jung-gu, Seoul".to_string(),
            category: Category::Japanese,
            rating: 5,
            review: Some("Upscale Japanese dining. Fresh sushi and sashimi.".to_string()),
            latitude: 37.563098,
            longitude: 126.983478,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_records_are_valid() {
        let seed = initial_restaurants();
        assert_eq!(seed.len(), 5);
        for r in &seed {
            r.validate().unwrap();
        }
    }
}
