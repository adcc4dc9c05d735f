pub mod a001_prompt_library;
