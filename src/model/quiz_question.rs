use serde::{Deserialize, Serialize};

/// Questions ask whether the rating is strictly above this value.
pub const RATING_THRESHOLD: f32 = 6.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Poster identifier; the front-end resolves it to an image file.
    pub image: String,
    pub text: String,
    pub correct_answer: bool,
}

impl QuizQuestion {
    pub fn new(image: impl Into<String>, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            image: image.into(),
            text: text.into(),
            correct_answer,
        }
    }

    pub fn about_rating(movie: &MockMovie, threshold: f32) -> Self {
        Self::new(
            movie.title,
            format!("Рейтинг этого фильма больше чем {}?", threshold),
            movie.rating > threshold,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockMovie {
    pub title: &'static str,
    pub rating: f32,
}

const MOCK_MOVIES: [MockMovie; 10] = [
    MockMovie { title: "The Godfather", rating: 9.2 },
    MockMovie { title: "The Dark Knight", rating: 9.0 },
    MockMovie { title: "Kill Bill", rating: 8.1 },
    MockMovie { title: "The Avengers", rating: 8.0 },
    MockMovie { title: "Deadpool", rating: 8.0 },
    MockMovie { title: "The Green Knight", rating: 6.6 },
    MockMovie { title: "Old", rating: 5.8 },
    MockMovie { title: "The Ice Age Adventures of Buck Wild", rating: 4.3 },
    MockMovie { title: "Tesla", rating: 5.1 },
    MockMovie { title: "Vivarium", rating: 5.8 },
];

pub fn mock_movies() -> &'static [MockMovie] {
    &MOCK_MOVIES
}

pub fn mock_questions() -> Vec<QuizQuestion> {
    mock_movies()
        .iter()
        .map(|movie| QuizQuestion::about_rating(movie, RATING_THRESHOLD))
        .collect()
}
