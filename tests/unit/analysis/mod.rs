mod color;
mod seams;
