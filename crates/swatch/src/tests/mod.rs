// ABOUTME: End-to-end tests running the swatch commands against scratch projects
// ABOUTME: Each test builds its token tree in a temporary directory
