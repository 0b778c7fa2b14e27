mod canvas;
mod support;
